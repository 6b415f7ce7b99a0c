//! Drains one category's URL list through the [`Downloader`].

use tracing::info;

use super::downloader::Downloader;
use crate::config::DownloadTarget;
use crate::store::{self, AppendLog, ProcessedStore, StoreError};

/// Counts from one category run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Files saved this run.
    pub downloaded: usize,
    /// Attempts that failed and were written to the failure log.
    pub failed: usize,
    /// URLs already present in the category log.
    pub skipped: usize,
    /// URLs read from the category list.
    pub total: usize,
}

/// Runs the download loop for a [`DownloadTarget`].
#[derive(Debug, Clone)]
pub struct DownloadRunner {
    downloader: Downloader,
}

impl DownloadRunner {
    /// Wraps a configured downloader.
    #[must_use]
    pub fn new(downloader: Downloader) -> Self {
        Self { downloader }
    }

    /// Downloads every URL in the target's list, in order.
    ///
    /// Each URL leaves the list once it has been attempted, whether the
    /// download succeeded, failed, or was skipped as already downloaded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the category list is missing, or if the
    /// folder, list, or log cannot be written. Per-URL download failures are
    /// counted, not returned.
    pub async fn process_category(
        &self,
        target: &DownloadTarget,
    ) -> Result<DownloadSummary, StoreError> {
        std::fs::create_dir_all(&target.folder).map_err(|e| StoreError::io(&target.folder, e))?;
        let urls = store::read_urls(&target.list)?;
        let mut log = AppendLog::open(&target.log)?;

        let mut summary = DownloadSummary {
            total: urls.len(),
            ..DownloadSummary::default()
        };
        info!(category = %target.category, count = urls.len(), "starting downloads");

        for url in &urls {
            if log.contains(url) {
                info!(%url, "skipping already downloaded URL");
                summary.skipped += 1;
            } else {
                match self.downloader.download(url, &target.folder, &mut log).await {
                    Ok(_) => summary.downloaded += 1,
                    Err(_) => summary.failed += 1,
                }
            }
            store::remove_url(&target.list, url)?;
        }

        log.flush()?;
        info!(
            category = %target.category,
            downloaded = summary.downloaded,
            failed = summary.failed,
            skipped = summary.skipped,
            "category complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Category;
    use crate::download::DownloadClient;
    use crate::store::FailureLog;
    use std::path::Path;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target(root: &Path) -> DownloadTarget {
        DownloadTarget {
            category: Category::Loras,
            list: root.join("loras.txt"),
            folder: root.join("loras"),
            log: root.join("loras_downloaded.log"),
        }
    }

    fn runner(root: &Path) -> DownloadRunner {
        let client = DownloadClient::new(None).unwrap();
        DownloadRunner::new(Downloader::new(
            client,
            FailureLog::new(root.join("failed_downloads.txt")),
        ))
    }

    #[tokio::test]
    async fn test_missing_list_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = runner(temp_dir.path())
            .process_category(&target(temp_dir.path()))
            .await;
        assert!(matches!(result, Err(StoreError::Missing { .. })));
        assert!(temp_dir.path().join("loras").is_dir());
    }

    #[tokio::test]
    async fn test_every_attempted_url_leaves_the_list() {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();
        let target = target(temp_dir.path());

        Mock::given(method("GET"))
            .and(path("/ok.safetensors"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken.safetensors"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let done = format!("{}/done.safetensors", mock_server.uri());
        let ok = format!("{}/ok.safetensors", mock_server.uri());
        let broken = format!("{}/broken.safetensors", mock_server.uri());
        std::fs::write(&target.log, format!("{done}\n")).unwrap();
        std::fs::write(&target.list, format!("{done}\n{ok}\n{broken}\n")).unwrap();

        let summary = runner(temp_dir.path())
            .process_category(&target)
            .await
            .unwrap();

        assert_eq!(
            summary,
            DownloadSummary {
                downloaded: 1,
                failed: 1,
                skipped: 1,
                total: 3,
            }
        );
        assert!(store::read_urls(&target.list).unwrap().is_empty());
        assert!(target.folder.join("ok.safetensors").exists());

        let log = std::fs::read_to_string(&target.log).unwrap();
        assert!(log.contains(&ok));
        assert!(!log.contains(&broken));

        let failures =
            std::fs::read_to_string(temp_dir.path().join("failed_downloads.txt")).unwrap();
        assert!(failures.contains(&broken));
    }
}
