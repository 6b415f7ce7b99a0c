//! Append-only processed-set stores.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::StoreError;
use super::url_list::append_line;

/// Set of keys (URLs or paths) already handled.
///
/// Call sites only depend on this interface so the backing storage can change
/// without touching them.
pub trait ProcessedStore: Send {
    /// Returns true if `key` has been recorded.
    fn contains(&self, key: &str) -> bool;

    /// Records `key`. Returns `false` if it was already present, in which case
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the key cannot be persisted.
    fn add(&mut self, key: &str) -> Result<bool, StoreError>;

    /// Forces buffered records to durable storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if syncing fails.
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Number of distinct keys.
    fn len(&self) -> usize;

    /// True when no key has been recorded.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Processed store backed by a newline-delimited, append-only text file.
///
/// The file is loaded fully into an in-memory index on open. Each `add`
/// appends one line immediately; the file is created on first write and is
/// never rewritten or compacted. Duplicate lines left by earlier runs are
/// harmless because only membership matters.
#[derive(Debug)]
pub struct AppendLog {
    path: PathBuf,
    index: HashSet<String>,
}

impl AppendLog {
    /// Opens `path`, loading existing entries. A missing file is an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let index = match fs::read_to_string(&path) {
            Ok(raw) => raw
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        debug!(path = %path.display(), entries = index.len(), "loaded processed log");
        Ok(Self { path, index })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProcessedStore for AppendLog {
    fn contains(&self, key: &str) -> bool {
        self.index.contains(key.trim())
    }

    fn add(&mut self, key: &str) -> Result<bool, StoreError> {
        let key = key.trim();
        if self.index.contains(key) {
            return Ok(false);
        }
        append_line(&self.path, key)?;
        self.index.insert(key.to_string());
        Ok(true)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => file.sync_data().map_err(|e| StoreError::io(&self.path, e)),
            // Nothing was ever written.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
