//! Duplicate Auditor: finds files in a folder whose names already appear in a
//! log of known filenames, and deletes them on request.
//!
//! Detection never deletes anything. [`delete_duplicates`] is a separate call
//! that callers gate behind explicit confirmation.

mod encoding;
mod error;
mod targets;

pub use encoding::{TextEncoding, decode_first};
pub use error::AuditError;
pub use targets::{AuditTarget, PREDEFINED_TARGETS, predefined_targets};

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// Overlap between a log and a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateReport {
    /// Basenames present in both the log and the folder.
    pub duplicates: BTreeSet<String>,
    /// Full in-folder paths of the duplicates, sorted.
    pub paths: Vec<PathBuf>,
}

impl DuplicateReport {
    /// Whether no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// One file that could not be deleted.
#[derive(Debug)]
pub struct DeletionFailure {
    /// The file.
    pub path: PathBuf,
    /// Why deletion failed.
    pub error: std::io::Error,
}

/// Outcome of [`delete_duplicates`].
#[derive(Debug, Default)]
pub struct DeletionReport {
    /// Files removed.
    pub deleted: Vec<PathBuf>,
    /// Files that could not be removed.
    pub failures: Vec<DeletionFailure>,
}

/// Audits `folder` against `log` using [`TextEncoding::FALLBACK_ORDER`].
///
/// # Errors
///
/// See [`audit_with_encodings`].
pub fn audit(log: &Path, folder: &Path) -> Result<DuplicateReport, AuditError> {
    audit_with_encodings(log, folder, &TextEncoding::FALLBACK_ORDER)
}

/// Audits `folder` against `log`, decoding the log with the first encoding
/// in `encodings` that succeeds.
///
/// Only regular files directly inside `folder` are compared. Log lines are
/// reduced to their basename, so recorded directory prefixes do not matter.
///
/// # Errors
///
/// Returns [`AuditError::LogMissing`] or [`AuditError::FolderMissing`] if
/// either input is absent, [`AuditError::Undecodable`] if no encoding
/// accepts the log, or [`AuditError::Io`] on read failure.
pub fn audit_with_encodings(
    log: &Path,
    folder: &Path,
    encodings: &[TextEncoding],
) -> Result<DuplicateReport, AuditError> {
    let known = read_log_basenames(log, encodings)?;
    if !folder.is_dir() {
        return Err(AuditError::FolderMissing {
            path: folder.to_path_buf(),
        });
    }

    let mut report = DuplicateReport::default();
    let entries = fs::read_dir(folder).map_err(|e| AuditError::io(folder, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| AuditError::io(folder, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if known.contains(&name) {
            report.duplicates.insert(name);
            report.paths.push(path);
        }
    }
    report.paths.sort();

    info!(
        log = %log.display(),
        folder = %folder.display(),
        duplicates = report.duplicates.len(),
        "audit complete"
    );
    Ok(report)
}

/// Reads `log` as a set of basenames.
///
/// # Errors
///
/// See [`audit_with_encodings`].
pub fn read_log_basenames(
    log: &Path,
    encodings: &[TextEncoding],
) -> Result<HashSet<String>, AuditError> {
    let bytes = match fs::read(log) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AuditError::LogMissing {
                path: log.to_path_buf(),
            });
        }
        Err(e) => return Err(AuditError::io(log, e)),
    };
    let (encoding, text) = decode_first(&bytes, encodings).ok_or_else(|| {
        AuditError::Undecodable {
            path: log.to_path_buf(),
        }
    })?;
    debug!(log = %log.display(), %encoding, "decoded log");

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| basename(line).to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

/// Final component of a `/`- or `\`-separated path string.
fn basename(line: &str) -> &str {
    line.rsplit(['/', '\\']).next().unwrap_or(line)
}

/// Deletes each path independently; one failure does not stop the rest.
#[must_use]
pub fn delete_duplicates(paths: &[PathBuf]) -> DeletionReport {
    let mut report = DeletionReport::default();
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "deleted");
                report.deleted.push(path.clone());
            }
            Err(error) => {
                warn!(path = %path.display(), error = %error, "failed to delete");
                report.failures.push(DeletionFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }
    report
}
