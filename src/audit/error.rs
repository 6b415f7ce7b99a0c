//! Error types for the duplicate audit.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort one audit.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The log of known filenames does not exist.
    #[error("log file not found: {path}")]
    LogMissing {
        /// Expected log path.
        path: PathBuf,
    },

    /// The folder to audit does not exist.
    #[error("folder not found: {path}")]
    FolderMissing {
        /// Expected folder path.
        path: PathBuf,
    },

    /// No supported text encoding could decode the log.
    #[error("unable to read log file {path} with any supported encoding")]
    Undecodable {
        /// The log that failed to decode.
        path: PathBuf,
    },

    /// The log or folder could not be read.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl AuditError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
