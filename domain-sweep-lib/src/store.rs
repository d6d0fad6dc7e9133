//! Result persistence.
//!
//! Each result set is a single-column table (`domain`) saved as CSV. Saves
//! always overwrite the whole file, so the on-disk order is exactly the
//! in-memory order.

use crate::error::DomainSweepError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One row of a result file.
#[derive(Debug, Serialize, Deserialize)]
struct DomainRow {
    domain: String,
}

/// Load/save capability for one result set.
pub trait ResultStore {
    /// Load rows in file order. A store that does not exist yet is empty.
    fn load(&self) -> Result<Vec<String>, DomainSweepError>;

    /// Replace the stored rows with `domains`.
    fn save(&self, domains: &[String]) -> Result<(), DomainSweepError>;
}

impl<T: ResultStore + ?Sized> ResultStore for &T {
    fn load(&self) -> Result<Vec<String>, DomainSweepError> {
        (**self).load()
    }

    fn save(&self, domains: &[String]) -> Result<(), DomainSweepError> {
        (**self).save(domains)
    }
}

/// CSV file with a `domain` header column.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, err: impl std::fmt::Display) -> DomainSweepError {
        DomainSweepError::storage(self.path.to_string_lossy(), err.to_string())
    }
}

impl ResultStore for CsvStore {
    fn load(&self) -> Result<Vec<String>, DomainSweepError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| self.storage_error(e))?;
        let mut domains = Vec::new();
        for row in reader.deserialize::<DomainRow>() {
            let row = row.map_err(|e| self.storage_error(e))?;
            domains.push(row.domain);
        }

        Ok(domains)
    }

    fn save(&self, domains: &[String]) -> Result<(), DomainSweepError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| self.storage_error(e))?;
        if domains.is_empty() {
            // serde only writes the header alongside the first record
            writer
                .write_record(["domain"])
                .map_err(|e| self.storage_error(e))?;
        }
        for domain in domains {
            writer
                .serialize(DomainRow {
                    domain: domain.clone(),
                })
                .map_err(|e| self.storage_error(e))?;
        }
        writer.flush().map_err(|e| self.storage_error(e))?;

        Ok(())
    }
}

/// Ordered collection of checked domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    domains: Vec<String>,
}

impl ResultSet {
    pub fn push(&mut self, domain: impl Into<String>) {
        self.domains.push(domain.into());
    }

    /// Sort ascending by domain string.
    pub fn sort(&mut self) {
        self.domains.sort();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.domains
    }
}

impl From<Vec<String>> for ResultSet {
    fn from(domains: Vec<String>) -> Self {
        Self { domains }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("non_existent.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("available_domains.csv");
        fs::write(&path, "domain\nshop.com\nmy.net\n").unwrap();

        let store = CsvStore::new(&path);
        assert_eq!(store.load().unwrap(), strings(&["shop.com", "my.net"]));
    }

    #[test]
    fn test_save_writes_header_and_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let store = CsvStore::new(&path);

        store.save(&strings(&["zeta.com", "alpha.com"])).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "domain\nzeta.com\nalpha.com\n");
        assert_eq!(store.load().unwrap(), strings(&["zeta.com", "alpha.com"]));
    }

    #[test]
    fn test_save_empty_set_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("empty.csv"));

        store.save(&[]).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "domain\n");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("out.csv"));

        store.save(&strings(&["a.com", "b.com", "c.com"])).unwrap();
        store.save(&strings(&["d.com"])).unwrap();
        assert_eq!(store.load().unwrap(), strings(&["d.com"]));
    }

    #[test]
    fn test_non_ascii_and_comma_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("out.csv"));
        let rows = strings(&["shöp.com", "odd,name.io", "shop..net"]);

        store.save(&rows).unwrap();
        assert_eq!(store.load().unwrap(), rows);
    }

    #[test]
    fn test_write_failure_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the CSV file should be
        let store = CsvStore::new(dir.path());

        match store.save(&strings(&["a.com"])) {
            Err(DomainSweepError::StorageError { path, .. }) => {
                assert_eq!(path, dir.path().to_string_lossy());
            }
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[test]
    fn test_result_set_sort() {
        let mut set = ResultSet::from(strings(&["zeta.com", "alpha.com", "gamma.com"]));
        set.sort();
        assert_eq!(set.as_slice(), &strings(&["alpha.com", "gamma.com", "zeta.com"])[..]);
    }
}
