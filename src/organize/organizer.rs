//! Hash-based classification and relocation of local model files.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument, warn};

use super::error::OrganizeError;
use super::family::BaseModelBucket;
use super::hashing::sha256_file_async;
use super::scan::find_safetensors;
use crate::api::{ModelApi, VersionResponse};
use crate::download::clean_filename;

/// Result of classifying one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationOutcome {
    /// Where the file was before classification.
    pub original_path: PathBuf,
    /// Where the file is now. Equals `original_path` when the move failed.
    pub final_path: PathBuf,
    /// Lowercase hex SHA-256 of the file.
    pub sha256: String,
    /// Destination bucket.
    pub bucket: BaseModelBucket,
    /// Name used for the file, without extension.
    pub display_name: String,
    /// Whether the file was relocated.
    pub moved: bool,
}

/// Counts from one organize pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeSummary {
    /// Files hashed and classified.
    pub processed: usize,
    /// Files relocated.
    pub moved: usize,
    /// Files placed in the `none` bucket.
    pub unclassified: usize,
    /// Files left in place because the move failed.
    pub failed_moves: usize,
    /// Files that could not be read for hashing.
    pub unreadable: usize,
}

/// Moves files into `<root>/<bucket>/<model name>.<ext>` based on a by-hash
/// lookup. Existing files at the destination are replaced.
pub struct Organizer {
    api: Arc<dyn ModelApi>,
    root: PathBuf,
    show_progress: bool,
}

impl fmt::Debug for Organizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Organizer")
            .field("base", &self.api.endpoints().base())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Organizer {
    /// Creates an organizer placing files under `root`.
    #[must_use]
    pub fn new(api: Arc<dyn ModelApi>, root: impl Into<PathBuf>) -> Self {
        Self {
            api,
            root: root.into(),
            show_progress: false,
        }
    }

    /// Enables the per-file progress bar.
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Destination root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the family folders and the `none` bucket under the root.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::Io`] if a folder cannot be created.
    pub fn prepare_folders(&self) -> Result<(), OrganizeError> {
        for folder in BaseModelBucket::predefined_folders() {
            let path = self.root.join(folder);
            fs::create_dir_all(&path).map_err(|e| OrganizeError::io(&path, e))?;
        }
        Ok(())
    }

    /// Hashes, looks up, renames, and moves one file.
    ///
    /// A failed lookup sends the file to the `none` bucket. A failed move is
    /// logged and reported through [`ClassificationOutcome::moved`].
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::Hash`] if the file cannot be read.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn classify(&self, path: &Path) -> Result<ClassificationOutcome, OrganizeError> {
        let sha256 = sha256_file_async(path).await?;
        debug!(%sha256, "hashed file");

        let version = match self.api.fetch_version_by_hash(&sha256).await {
            Ok(version) => Some(version),
            Err(error) => {
                warn!(%sha256, error = %error, "hash lookup failed; treating as unclassified");
                None
            }
        };

        let bucket = version.as_ref().map_or(BaseModelBucket::Unclassified, bucket_for);
        let display_name = display_name(version.as_ref(), path);
        let file_name = match path.extension() {
            Some(ext) => format!("{display_name}.{}", ext.to_string_lossy()),
            None => display_name.clone(),
        };

        let target_dir = self.root.join(bucket.folder_name());
        let target = target_dir.join(&file_name);
        let (final_path, moved) = match fs::create_dir_all(&target_dir)
            .map_err(|e| OrganizeError::io(&target_dir, e))
            .and_then(|()| move_file(path, &target))
        {
            Ok(()) => (target, true),
            Err(error) => {
                warn!(error = %error, "move failed; leaving file in place");
                (path.to_path_buf(), false)
            }
        };

        info!(bucket = %bucket, name = %file_name, moved, "classified");
        Ok(ClassificationOutcome {
            original_path: path.to_path_buf(),
            final_path,
            sha256,
            bucket,
            display_name,
            moved,
        })
    }

    /// Classifies every `.safetensors` file under `folder`, recursively.
    ///
    /// The file list is collected before anything moves, so files relocated
    /// into a subfolder of `folder` are not visited twice.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::FolderMissing`] if `folder` is not a
    /// directory, or [`OrganizeError::Io`] if the bucket folders cannot be
    /// created. Per-file failures are counted, not returned.
    pub async fn organize_folder(&self, folder: &Path) -> Result<OrganizeSummary, OrganizeError> {
        let files = find_safetensors(folder)?;
        self.prepare_folders()?;
        info!(folder = %folder.display(), count = files.len(), "organizing files");

        let progress = self.progress_bar(files.len());
        let mut summary = OrganizeSummary::default();
        for file in &files {
            progress.set_message(
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
            match self.classify(file).await {
                Ok(outcome) => {
                    summary.processed += 1;
                    if outcome.bucket == BaseModelBucket::Unclassified {
                        summary.unclassified += 1;
                    }
                    if outcome.moved {
                        summary.moved += 1;
                    } else {
                        summary.failed_moves += 1;
                    }
                }
                Err(error) => {
                    warn!(error = %error, "skipping unreadable file");
                    summary.unreadable += 1;
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            processed = summary.processed,
            moved = summary.moved,
            unclassified = summary.unclassified,
            failed_moves = summary.failed_moves,
            "organize complete"
        );
        Ok(summary)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }
}

/// Both `baseModel` and `baseModelType` must be present to classify.
fn bucket_for(version: &VersionResponse) -> BaseModelBucket {
    match (&version.base_model, &version.base_model_type) {
        (Some(base_model), Some(_)) => BaseModelBucket::from_base_model(base_model),
        _ => BaseModelBucket::Unclassified,
    }
}

/// Cleaned model name from the lookup, else the file's own stem.
fn display_name(version: Option<&VersionResponse>, path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    version
        .and_then(VersionResponse::model_name)
        .map(clean_filename)
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .unwrap_or(stem)
}

/// Renames `from` to `to`, replacing `to`. Falls back to copy-then-delete
/// when a rename is not possible, e.g. across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<(), OrganizeError> {
    if from == to {
        return Ok(());
    }
    if let Err(rename_error) = fs::rename(from, to) {
        debug!(error = %rename_error, "rename failed; copying instead");
        fs::copy(from, to).map_err(|e| OrganizeError::io(to, e))?;
        if let Err(e) = fs::remove_file(from) {
            if let Err(cleanup) = fs::remove_file(to) {
                warn!(path = %to.display(), error = %cleanup, "could not remove copied file");
            }
            return Err(OrganizeError::io(from, e));
        }
    }
    Ok(())
}
