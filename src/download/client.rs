//! HTTP client wrapper for streaming model files to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use reqwest::header::CONTENT_DISPOSITION;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::{filename_from_url, parse_content_disposition, unique_path, usable_filename};
use crate::user_agent;

/// Attempts at claiming a free filename when another writer races us to it.
const CREATE_ATTEMPTS: usize = 3;

/// HTTP client for downloading files with streaming support.
///
/// Created once and reused for every download in a run so connections are
/// pooled. Sends `Authorization: Bearer <key>` when a key is configured.
#[derive(Clone)]
pub struct DownloadClient {
    client: Client,
    api_key: Option<String>,
    show_progress: bool,
}

impl std::fmt::Debug for DownloadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("show_progress", &self.show_progress)
            .finish_non_exhaustive()
    }
}

impl DownloadClient {
    /// Creates a client with default timeouts (30s connect, 5min between reads).
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the underlying client cannot be built.
    pub fn new(api_key: Option<String>) -> Result<Self, DownloadError> {
        Self::with_timeouts(api_key, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the underlying client cannot be built.
    pub fn with_timeouts(
        api_key: Option<String>,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(user_agent::default_download_user_agent())
            .gzip(true)
            .build()
            .map_err(DownloadError::Client)?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            show_progress: false,
        })
    }

    /// Enables the per-file byte progress bar.
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Downloads `url` into `output_dir`, creating the directory if needed.
    ///
    /// The filename comes from Content-Disposition when present, else from the
    /// final URL path segment. An existing file is never overwritten; the new
    /// file gets a `(N)` suffix instead.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for an invalid URL, a transport failure, a
    /// non-2xx status, or a filesystem error. A partially written file is
    /// removed before returning.
    #[instrument(skip(self, output_dir), fields(url = %url))]
    pub async fn download_to_file(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| DownloadError::io(output_dir, e))?;

        let mut request = self.client.get(parsed_url.clone());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let filename = extract_filename(&response, &parsed_url);
        let (file_path, mut file) = create_unique_file(output_dir, &filename).await?;
        debug!(filename = %filename, path = %file_path.display(), "resolved output path");

        let progress = self.progress_bar(response.content_length(), &filename);
        let stream_result = stream_to_file(&mut file, response, url, &file_path, &progress).await;
        progress.finish_and_clear();
        drop(file);

        let bytes = match stream_result {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(path = %file_path.display(), "cleaning up partial file after error");
                if let Err(cleanup) = tokio::fs::remove_file(&file_path).await {
                    warn!(path = %file_path.display(), error = %cleanup, "could not remove partial file");
                }
                return Err(error);
            }
        };

        info!(path = %file_path.display(), bytes, "download complete");
        Ok(file_path)
    }

    fn progress_bar(&self, content_length: Option<u64>, filename: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = match content_length.filter(|len| *len > 0) {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{msg} [{bar:30}] {bytes}/{total_bytes} {bytes_per_sec} {eta}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{spinner} {msg} {bytes} {bytes_per_sec}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.set_message(filename.to_string());
        bar
    }
}

/// Opens a fresh file under `dir`, retrying if the chosen name is claimed
/// between the existence check and the create.
async fn create_unique_file(dir: &Path, filename: &str) -> Result<(PathBuf, File), DownloadError> {
    let mut last_error = None;
    for _ in 0..CREATE_ATTEMPTS {
        let path = unique_path(dir, filename).ok_or_else(|| DownloadError::NoFreeName {
            dir: dir.to_path_buf(),
            filename: filename.to_string(),
        })?;
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                last_error = Some(DownloadError::io(&path, e));
            }
            Err(e) => return Err(DownloadError::io(path, e)),
        }
    }
    Err(last_error.unwrap_or_else(|| DownloadError::NoFreeName {
        dir: dir.to_path_buf(),
        filename: filename.to_string(),
    }))
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    progress: &ProgressBar,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
        progress.inc(chunk.len() as u64);
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}

/// Extracts a cleaned filename from Content-Disposition or the URL path.
fn extract_filename(response: &reqwest::Response, url: &Url) -> String {
    let from_header = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|cd| cd.to_str().ok())
        .and_then(parse_content_disposition);

    let raw = from_header
        .or_else(|| filename_from_url(url))
        .unwrap_or_default();
    usable_filename(&raw)
}
