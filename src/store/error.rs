//! Error type for flat-file stores.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the processed store, URL lists, and failure log.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file that must already exist is absent.
    #[error("{path} not found")]
    Missing {
        /// The missing file.
        path: PathBuf,
    },

    /// Reading or writing the backing file failed.
    #[error("IO error on {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing-file error.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }
}
