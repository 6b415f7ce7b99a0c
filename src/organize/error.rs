//! Error types for the organize module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from hashing, scanning, or relocating local model files.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The folder to scan does not exist or is not a directory.
    #[error("folder not found: {path}")]
    FolderMissing {
        /// The folder that was requested.
        path: PathBuf,
    },

    /// A file could not be read for hashing.
    #[error("failed to hash {path}: {source}")]
    Hash {
        /// The file being hashed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Filesystem error creating folders, writing lists, or moving a file.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl OrganizeError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a hashing error.
    pub fn hash(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Hash {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing-folder error.
    pub fn folder_missing(path: impl Into<PathBuf>) -> Self {
        Self::FolderMissing { path: path.into() }
    }
}
