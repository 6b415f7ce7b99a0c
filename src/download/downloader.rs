//! Single-URL download with success and failure bookkeeping.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::client::DownloadClient;
use super::error::DownloadError;
use crate::store::{FailureLog, ProcessedStore};

/// Downloads one URL and records the outcome.
///
/// Success is recorded in the caller's processed store; any failure is
/// appended to the permanent [`FailureLog`].
#[derive(Debug, Clone)]
pub struct Downloader {
    client: DownloadClient,
    failures: FailureLog,
}

impl Downloader {
    /// Creates a downloader writing failures to `failures`.
    #[must_use]
    pub fn new(client: DownloadClient, failures: FailureLog) -> Self {
        Self { client, failures }
    }

    /// Downloads `url` into `folder` and records the URL in `log` on success.
    ///
    /// # Errors
    ///
    /// Returns the [`DownloadError`] that stopped the download, after it has
    /// been written to the failure log.
    pub async fn download(
        &self,
        url: &str,
        folder: &Path,
        log: &mut dyn ProcessedStore,
    ) -> Result<PathBuf, DownloadError> {
        let result = self.download_and_log(url, folder, log).await;
        if let Err(error) = &result {
            warn!(%url, error = %error, "download failed");
            if let Err(record_error) = self.failures.record(url, &error.to_string()) {
                warn!(%url, error = %record_error, "could not write failure log");
            }
        }
        result
    }

    async fn download_and_log(
        &self,
        url: &str,
        folder: &Path,
        log: &mut dyn ProcessedStore,
    ) -> Result<PathBuf, DownloadError> {
        let path = self.client.download_to_file(url, folder).await?;
        log.add(url).map_err(DownloadError::Log)?;
        info!(%url, path = %path.display(), "downloaded");
        Ok(path)
    }
}
