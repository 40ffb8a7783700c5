use std::path::Path;

/// Appends lines to a log destination, creating parent directories on demand.
pub trait RateLog: Send {
    fn append_line(&mut self, path: &Path, line: &str) -> Result<(), Box<dyn std::error::Error>>;
}
