//! Reverse lookup: turns local files back into model page URLs.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::OrganizeError;
use super::hashing::sha256_file_async;
use super::scan::find_safetensors;
use crate::api::ModelApi;

/// Counts from one lookup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupSummary {
    /// Files hashed and looked up.
    pub scanned: usize,
    /// Files whose hash matched a known version.
    pub found: usize,
    /// Files with no match (or an unreadable file).
    pub not_found: usize,
}

/// Hashes every `.safetensors` file in a folder and writes the page URLs of
/// matching versions to `found_list`; unmatched files go to `not_found_list`
/// as paths relative to the scanned folder.
pub struct ReverseLookup {
    api: Arc<dyn ModelApi>,
    found_list: PathBuf,
    not_found_list: PathBuf,
}

impl fmt::Debug for ReverseLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReverseLookup")
            .field("found_list", &self.found_list)
            .field("not_found_list", &self.not_found_list)
            .finish_non_exhaustive()
    }
}

impl ReverseLookup {
    /// Creates a lookup writing to the given lists.
    #[must_use]
    pub fn new(
        api: Arc<dyn ModelApi>,
        found_list: impl Into<PathBuf>,
        not_found_list: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api,
            found_list: found_list.into(),
            not_found_list: not_found_list.into(),
        }
    }

    /// Runs the lookup over `folder`. Both output lists are truncated first.
    ///
    /// Each match contributes two lines: the model page and the model page
    /// pinned to the matched version.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::FolderMissing`] if `folder` is not a
    /// directory, or [`OrganizeError::Io`] if an output list cannot be written.
    pub async fn run(&self, folder: &Path) -> Result<LookupSummary, OrganizeError> {
        let files = find_safetensors(folder)?;
        let mut found = create_list(&self.found_list)?;
        let mut not_found = create_list(&self.not_found_list)?;
        let endpoints = self.api.endpoints();
        let mut summary = LookupSummary::default();

        for file in &files {
            summary.scanned += 1;
            let ids = match sha256_file_async(file).await {
                Ok(sha256) => match self.api.fetch_version_by_hash(&sha256).await {
                    Ok(version) => version.model_id.zip(version.id),
                    Err(error) => {
                        debug!(path = %file.display(), error = %error, "no match for hash");
                        None
                    }
                },
                Err(error) => {
                    warn!(error = %error, "could not hash file");
                    None
                }
            };

            if let Some((model_id, version_id)) = ids {
                writeln!(found, "{}", endpoints.model_page_url(model_id))
                    .and_then(|()| {
                        writeln!(found, "{}", endpoints.version_page_url(model_id, version_id))
                    })
                    .map_err(|e| OrganizeError::io(&self.found_list, e))?;
                summary.found += 1;
            } else {
                let relative = file.strip_prefix(folder).unwrap_or(file.as_path());
                writeln!(not_found, "{}", relative.display())
                    .map_err(|e| OrganizeError::io(&self.not_found_list, e))?;
                summary.not_found += 1;
            }
        }

        found
            .flush()
            .map_err(|e| OrganizeError::io(&self.found_list, e))?;
        not_found
            .flush()
            .map_err(|e| OrganizeError::io(&self.not_found_list, e))?;

        info!(
            scanned = summary.scanned,
            found = summary.found,
            not_found = summary.not_found,
            "lookup complete"
        );
        Ok(summary)
    }
}

fn create_list(path: &Path) -> Result<BufWriter<File>, OrganizeError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| OrganizeError::io(path, e))
}
