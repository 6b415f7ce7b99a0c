//! Recursive model file discovery.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use super::error::OrganizeError;

const MODEL_EXTENSION: &str = ".safetensors";

/// All `*.safetensors` regular files under `folder`, in walk order.
///
/// Entries that cannot be read (an unreadable subfolder, a broken link) are
/// logged and skipped.
pub(crate) fn find_safetensors(folder: &Path) -> Result<Vec<PathBuf>, OrganizeError> {
    if !folder.is_dir() {
        return Err(OrganizeError::folder_missing(folder));
    }
    Ok(WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                let path = error.path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!(%path, error = %error, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(MODEL_EXTENSION))
        .map(walkdir::DirEntry::into_path)
        .collect())
}
