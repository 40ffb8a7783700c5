use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceSpecError {
    #[error("invalid video source '{0}': not a camera index and no such file")]
    Invalid(String),
}

/// A validated `--source` argument.
///
/// Resolution order mirrors the common capture-API convention: a string of
/// digits names a file if one exists at that path, otherwise it is a camera
/// index; anything else must be an existing file. Validation happens here,
/// before any pipeline thread is spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSpec {
    /// Built-in synthetic test pattern; needs no external device or file.
    Pattern,
    File(PathBuf),
    Camera(u32),
}

impl SourceSpec {
    pub fn parse(value: &str) -> Result<Self, SourceSpecError> {
        if value == "pattern" {
            return Ok(SourceSpec::Pattern);
        }

        let path = Path::new(value);
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            if path.is_file() {
                return Ok(SourceSpec::File(path.to_path_buf()));
            }
            // Digit strings fit in u32 or they are not a plausible index.
            return value
                .parse::<u32>()
                .map(SourceSpec::Camera)
                .map_err(|_| SourceSpecError::Invalid(value.to_string()));
        }

        if path.is_file() {
            return Ok(SourceSpec::File(path.to_path_buf()));
        }

        Err(SourceSpecError::Invalid(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_pattern_keyword() {
        assert_eq!(SourceSpec::parse("pattern").unwrap(), SourceSpec::Pattern);
    }

    #[rstest]
    #[case::camera_zero("0", 0)]
    #[case::camera_two("2", 2)]
    fn test_digit_string_without_file_is_camera(#[case] value: &str, #[case] index: u32) {
        // No file by that relative name exists in the test environment.
        assert_eq!(
            SourceSpec::parse(value).unwrap(),
            SourceSpec::Camera(index)
        );
    }

    #[test]
    fn test_existing_file_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let value = file.path().to_str().unwrap();
        assert_eq!(
            SourceSpec::parse(value).unwrap(),
            SourceSpec::File(file.path().to_path_buf())
        );
    }

    #[test]
    fn test_digit_named_file_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("7");
        std::fs::write(&path, b"").unwrap();
        // The full path contains non-digits, so this exercises the file
        // branch; the digits-naming-a-file case needs a relative cwd path
        // and is covered by the factory's behavior with File specs.
        assert_eq!(
            SourceSpec::parse(path.to_str().unwrap()).unwrap(),
            SourceSpec::File(path)
        );
    }

    #[rstest]
    #[case::word("abc")]
    #[case::missing_path("/no/such/file.mp4")]
    #[case::empty("")]
    #[case::oversized_index("99999999999999999999")]
    fn test_invalid_sources_fail_fast(#[case] value: &str) {
        let err = SourceSpec::parse(value).unwrap_err();
        assert!(err.to_string().contains("invalid video source"));
    }
}
