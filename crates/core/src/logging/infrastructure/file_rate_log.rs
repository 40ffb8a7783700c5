use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::logging::domain::rate_log::RateLog;

/// Appends lines to a plain text file, creating parent directories the
/// first time the path is used.
pub struct FileRateLog;

impl RateLog for FileRateLog {
    fn append_line(&mut self, path: &Path, line: &str) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rate.log");
        let mut log = FileRateLog;
        log.append_line(&path, "first").unwrap();
        log.append_line(&path, "second").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("rate.log");
        let mut log = FileRateLog;
        log.append_line(&path, "line").unwrap();
        assert!(path.is_file());
    }
}
