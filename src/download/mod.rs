//! Downloader: streams resolved URLs to disk with collision-free names.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for multi-gigabyte checkpoints)
//! - Filename from Content-Disposition, else the final URL segment
//! - `name(N).ext` suffixes instead of overwriting
//! - Bearer authentication and byte progress bars
//! - Success recorded in a per-category log, failures in a permanent failure log
//!
//! # Example
//!
//! ```no_run
//! use civitai_core::download::{DownloadClient, Downloader};
//! use civitai_core::store::{AppendLog, FailureLog};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new(
//!     DownloadClient::new(None)?,
//!     FailureLog::new("failed_downloads.txt"),
//! );
//! let mut log = AppendLog::open("loras_downloaded.log")?;
//! let path = downloader
//!     .download("https://civitai.com/api/download/models/5678", Path::new("loras"), &mut log)
//!     .await?;
//! println!("Downloaded: {}", path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod downloader;
mod error;
mod filename;
mod runner;

pub use client::DownloadClient;
pub use constants::FALLBACK_FILENAME;
pub use downloader::Downloader;
pub use error::DownloadError;
pub use filename::{clean_filename, unique_path};
pub use runner::{DownloadRunner, DownloadSummary};
