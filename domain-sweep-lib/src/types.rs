//! Core data types for domain availability scanning.
//!
//! This module defines the shape of lookup answers, the outcome of a single
//! availability check, and the summary reported at the end of a scan.

use serde::Serialize;

/// A field that registries return either as a single value or as a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Iterate over the contained values regardless of shape.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value).iter(),
            OneOrMany::Many(values) => values.iter(),
        }
    }
}

/// Answer from a registration lookup.
///
/// The registration-owner field is normalized at the boundary: an empty
/// string, an empty list or a list of blank entries all become `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The lookup service reports no registration record at all
    NotFound,

    /// A registration record was returned
    Found { owner: Option<OneOrMany<String>> },
}

impl LookupOutcome {
    /// Build a `Found` outcome from raw owner-field values.
    ///
    /// Blank values are dropped; nothing left means no owner.
    pub fn found<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut truthy: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !v.trim().is_empty())
            .collect();

        let owner = match truthy.len() {
            0 => None,
            1 => truthy.pop().map(OneOrMany::One),
            _ => Some(OneOrMany::Many(truthy)),
        };

        LookupOutcome::Found { owner }
    }

    /// Whether this answer proves the domain is registered.
    pub fn is_registered(&self) -> bool {
        match self {
            LookupOutcome::NotFound => false,
            LookupOutcome::Found { owner: None } => false,
            LookupOutcome::Found { owner: Some(owner) } => {
                owner.iter().any(|v| !v.trim().is_empty())
            }
        }
    }
}

/// Result of checking one candidate domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Not registered
    Available,

    /// Registered
    Unavailable,

    /// Every attempt failed; treated as unavailable
    Unknown { attempts: u32 },
}

impl CheckOutcome {
    /// Collapse to the fail-closed boolean answer.
    pub fn is_available(&self) -> bool {
        matches!(self, CheckOutcome::Available)
    }
}

impl From<&LookupOutcome> for CheckOutcome {
    fn from(outcome: &LookupOutcome) -> Self {
        if outcome.is_registered() {
            CheckOutcome::Unavailable
        } else {
            CheckOutcome::Available
        }
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Available => write!(f, "Available"),
            CheckOutcome::Unavailable => write!(f, "Unavailable"),
            CheckOutcome::Unknown { .. } => write!(f, "Unknown"),
        }
    }
}

/// Counters reported when a scan finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Candidates looked up during this run
    pub checked: usize,

    /// Of those, how many were available
    pub available: usize,

    /// Of those, how many were confirmed registered
    pub unavailable: usize,

    /// Of those, how many were recorded as unavailable after exhausted retries
    pub assumed_unavailable: usize,

    /// Candidates skipped because an earlier run already recorded them
    pub skipped: usize,

    /// Rows in the available file after finalization
    pub total_available: usize,

    /// Rows in the unavailable file after finalization
    pub total_unavailable: usize,
}

impl ScanSummary {
    /// Count one check outcome.
    pub fn record(&mut self, outcome: CheckOutcome) {
        self.checked += 1;
        match outcome {
            CheckOutcome::Available => self.available += 1,
            CheckOutcome::Unavailable => self.unavailable += 1,
            CheckOutcome::Unknown { .. } => self.assumed_unavailable += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_normalizes_blank_owner() {
        assert_eq!(
            LookupOutcome::found(Vec::<String>::new()),
            LookupOutcome::Found { owner: None }
        );
        assert_eq!(
            LookupOutcome::found(vec!["", "  "]),
            LookupOutcome::Found { owner: None }
        );
        assert_eq!(
            LookupOutcome::found(vec!["", "EXAMPLE.COM"]),
            LookupOutcome::Found {
                owner: Some(OneOrMany::One("EXAMPLE.COM".to_string()))
            }
        );
        assert_eq!(
            LookupOutcome::found(vec!["example.com", "example.net"]),
            LookupOutcome::Found {
                owner: Some(OneOrMany::Many(vec![
                    "example.com".to_string(),
                    "example.net".to_string()
                ]))
            }
        );
    }

    #[test]
    fn test_is_registered() {
        assert!(!LookupOutcome::NotFound.is_registered());
        assert!(!LookupOutcome::Found { owner: None }.is_registered());
        assert!(!LookupOutcome::Found {
            owner: Some(OneOrMany::One(String::new()))
        }
        .is_registered());
        assert!(!LookupOutcome::Found {
            owner: Some(OneOrMany::Many(vec![String::new(), String::new()]))
        }
        .is_registered());
        assert!(LookupOutcome::Found {
            owner: Some(OneOrMany::Many(vec![String::new(), "x.com".to_string()]))
        }
        .is_registered());
        assert!(LookupOutcome::Found {
            owner: Some(OneOrMany::One("unavailable.com".to_string()))
        }
        .is_registered());
    }

    #[test]
    fn test_unknown_is_fail_closed() {
        assert!(CheckOutcome::Available.is_available());
        assert!(!CheckOutcome::Unavailable.is_available());
        assert!(!CheckOutcome::Unknown { attempts: 6 }.is_available());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = ScanSummary::default();
        summary.record(CheckOutcome::Available);
        summary.record(CheckOutcome::Unavailable);
        summary.record(CheckOutcome::Unknown { attempts: 6 });
        assert_eq!(summary.checked, 3);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.unavailable, 1);
        assert_eq!(summary.assumed_unavailable, 1);
    }
}
