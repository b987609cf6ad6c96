//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Read a file as UTF-8 text, separating decode failures from I/O failures.
pub fn read_text(path: &Path, display: &str) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("read {}", display))))?;
    decode_text(bytes, display)
}

/// Decode bytes as UTF-8, reporting `source.decode_failed` for `display`.
pub fn decode_text(bytes: Vec<u8>, display: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::source_decode_failed(display, e.to_string()))
}

/// Write content to file with standardized error handling.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Outcome of [`write_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

/// What [`write_if_changed`] would do, without writing.
pub fn planned_outcome(path: &Path, content: &str) -> WriteOutcome {
    match fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => WriteOutcome::Unchanged,
        Ok(_) => WriteOutcome::Updated,
        Err(_) => WriteOutcome::Created,
    }
}

/// Write `content` only when it differs from what is on disk.
///
/// Creates missing parent directories. An unchanged file is left untouched,
/// so its modification time does not move.
pub fn write_if_changed(path: &Path, content: &str, operation: &str) -> Result<WriteOutcome> {
    let outcome = planned_outcome(path, content);
    if outcome == WriteOutcome::Unchanged {
        return Ok(outcome);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("{} (create dirs)", operation)))
        })?;
    }

    write_file(path, content, operation)?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let err = read_file(Path::new("/nonexistent/path.txt"), "test read").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn read_text_reports_decode_failure() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let err = read_text(temp.path(), "Broken.java").unwrap_err();
        assert_eq!(err.code.as_str(), "source.decode_failed");
        assert!(err.message.contains("Broken.java"));
    }

    #[test]
    fn write_if_changed_creates_then_skips_then_updates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/File.java");

        assert_eq!(
            write_if_changed(&path, "one", "test").unwrap(),
            WriteOutcome::Created
        );
        assert_eq!(
            write_if_changed(&path, "one", "test").unwrap(),
            WriteOutcome::Unchanged
        );
        assert_eq!(
            write_if_changed(&path, "two", "test").unwrap(),
            WriteOutcome::Updated
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }
}
