//! Permanent, pipe-delimited log of failed downloads.

use std::path::{Path, PathBuf};

use super::StoreError;
use super::url_list::append_line;

/// Appends `<url> | Error: <message>` lines.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    /// Creates a log writing to `path`. The file is created on first record.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one failure. Newlines in `message` are flattened so each record
    /// stays on one line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the log cannot be written.
    pub fn record(&self, url: &str, message: &str) -> Result<(), StoreError> {
        let message = message.replace(['\r', '\n'], " ");
        append_line(&self.path, &format!("{url} | Error: {message}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_format() {
        let dir = TempDir::new().unwrap();
        let log = FailureLog::new(dir.path().join("failed_downloads.txt"));
        log.record("https://civitai.com/api/download/models/1", "HTTP 500")
            .unwrap();
        log.record("https://civitai.com/api/download/models/2", "line one\nline two")
            .unwrap();

        let raw = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            raw,
            "https://civitai.com/api/download/models/1 | Error: HTTP 500\n\
             https://civitai.com/api/download/models/2 | Error: line one line two\n"
        );
    }
}
