//! Whole-file SHA-256 digests used as lookup keys.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::error::OrganizeError;

/// Streams `path` through SHA-256 and returns the lowercase hex digest.
///
/// # Errors
///
/// Returns the IO error if the file cannot be opened or read.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// [`sha256_file`] on the blocking pool, so large checkpoints do not stall
/// the runtime.
pub(crate) async fn sha256_file_async(path: &Path) -> Result<String, OrganizeError> {
    let owned: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || sha256_file(&owned))
        .await
        .map_err(|e| OrganizeError::hash(path, io::Error::other(e)))?
        .map_err(|e| OrganizeError::hash(path, e))
}
