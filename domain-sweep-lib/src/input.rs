//! Input lists and candidate generation.
//!
//! Base names and extensions come from newline-delimited text files. Every
//! name is combined with every extension; nothing is validated as a DNS label.

use crate::events::{EventSink, ScanEvent};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Split text into trimmed, non-blank entries.
///
/// Accepts `\n`, `\r\n` and bare `\r` line endings.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read an input list from disk.
///
/// A file that cannot be read is reported to `sink` and yields an empty list;
/// the scan driver decides whether an empty list is fatal.
pub fn read_list<P: AsRef<Path>, S: EventSink>(path: P, sink: &S) -> Vec<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => parse_list(&content),
        Err(e) => {
            sink.emit(&ScanEvent::InputMissing {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
            Vec::new()
        }
    }
}

/// Combine every base name with every extension.
///
/// Extensions form the inner loop: `a.com, a.net, b.com, b.net`.
/// Duplicates are kept and a name ending in a dot yields `name..ext`.
pub fn generate_candidates(names: &[String], extensions: &[String]) -> Vec<String> {
    let mut results = Vec::with_capacity(names.len() * extensions.len());

    for name in names {
        for ext in extensions {
            results.push(format!("{}.{}", name, ext));
        }
    }

    results
}

/// Drop candidates already present in either result set, keeping order.
pub fn pending_candidates(
    candidates: &[String],
    available: &[String],
    unavailable: &[String],
) -> Vec<String> {
    let processed: HashSet<&str> = available
        .iter()
        .chain(unavailable.iter())
        .map(String::as_str)
        .collect();

    candidates
        .iter()
        .filter(|c| !processed.contains(c.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_list_trims_and_skips_blank_lines() {
        let content = "shop   \n\n  my\nbest \nsuper\n  \n";
        assert_eq!(parse_list(content), strings(&["shop", "my", "best", "super"]));
    }

    #[test]
    fn test_parse_list_line_endings_agree() {
        let unix = "shop\nmy\n\nbest \nsuper\n";
        let windows = "shop\r\nmy\r\n\r\nbest \r\nsuper\r\n";
        let old_mac = "shop\rmy\r\rbest \rsuper\r";
        assert_eq!(parse_list(unix), parse_list(windows));
        assert_eq!(parse_list(unix), parse_list(old_mac));
        assert_eq!(parse_list(windows), strings(&["shop", "my", "best", "super"]));
    }

    #[test]
    fn test_parse_list_keeps_dots_and_unicode() {
        assert_eq!(
            parse_list("shop.\nmy.\nbest.\nsuper.\n"),
            strings(&["shop.", "my.", "best.", "super."])
        );
        assert_eq!(
            parse_list("shöp\nmý\nbést\nsüpër\n"),
            strings(&["shöp", "mý", "bést", "süpër"])
        );
    }

    #[test]
    fn test_read_list_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "com \nnet\n org \nio\n").unwrap();

        let sink = RecordingSink::new();
        let result = read_list(file.path(), &sink);
        assert_eq!(result, strings(&["com", "net", "org", "io"]));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_read_list_missing_file_reports_and_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("non_existent_file.txt");

        let sink = RecordingSink::new();
        let result = read_list(&missing, &sink);
        assert!(result.is_empty());

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ScanEvent::InputMissing { path, .. } => assert_eq!(path, &missing),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_generate_candidates_order() {
        let names = strings(&["shop", "my"]);
        let extensions = strings(&["invalidext", "anotherfake"]);
        assert_eq!(
            generate_candidates(&names, &extensions),
            strings(&[
                "shop.invalidext",
                "shop.anotherfake",
                "my.invalidext",
                "my.anotherfake"
            ])
        );
    }

    #[test]
    fn test_generate_candidates_keeps_existing_dots() {
        let names = strings(&["shop.", "my", "best.com"]);
        let extensions = strings(&["com", "net"]);
        assert_eq!(
            generate_candidates(&names, &extensions),
            strings(&[
                "shop..com",
                "shop..net",
                "my.com",
                "my.net",
                "best.com.com",
                "best.com.net"
            ])
        );
    }

    #[test]
    fn test_generate_candidates_length_and_index() {
        let names: Vec<String> = (0..1000).map(|i| format!("domain{}", i)).collect();
        let extensions = strings(&["com", "net", "org"]);
        let candidates = generate_candidates(&names, &extensions);

        assert_eq!(candidates.len(), 3000);
        for (i, name) in names.iter().enumerate().step_by(97) {
            for (j, ext) in extensions.iter().enumerate() {
                assert_eq!(candidates[i * extensions.len() + j], format!("{}.{}", name, ext));
            }
        }
        assert_eq!(&candidates[..2], &strings(&["domain0.com", "domain0.net"])[..]);
        assert_eq!(candidates.last().map(String::as_str), Some("domain999.org"));
    }

    #[test]
    fn test_generate_candidates_no_dedup() {
        let names = strings(&["dup", "dup"]);
        let extensions = strings(&["com"]);
        assert_eq!(generate_candidates(&names, &extensions), strings(&["dup.com", "dup.com"]));
    }

    #[test]
    fn test_generate_candidates_empty_inputs() {
        assert!(generate_candidates(&[], &strings(&["com"])).is_empty());
        assert!(generate_candidates(&strings(&["a"]), &[]).is_empty());
    }

    #[test]
    fn test_pending_candidates_preserves_order() {
        let candidates = strings(&["a.com", "a.net", "b.com", "b.net"]);
        let available = strings(&["b.com"]);
        let unavailable = strings(&["a.com"]);
        assert_eq!(
            pending_candidates(&candidates, &available, &unavailable),
            strings(&["a.net", "b.net"])
        );
    }
}
