//! Civitai toolkit core library.
//!
//! Bulk-downloads and organizes AI model files ("checkpoints" and "LoRAs")
//! from Civitai. Every component is an independent pass over flat files:
//! resolve page URLs into per-type download lists, download those lists,
//! then sort or audit the resulting folders.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Workspace layout, API endpoint, and credential
//! - [`api`] - Remote model API client and response types
//! - [`store`] - Processed sets, URL lists, and the failure log
//! - [`resolver`] - Page URL to download URL resolution
//! - [`download`] - Streaming downloads with collision-free names
//! - [`organize`] - Hash-based classification and reverse lookup
//! - [`audit`] - Duplicate detection against filename logs
//! - [`prompt`] - Interactive choice and confirmation interface

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod audit;
pub mod config;
pub mod download;
pub mod organize;
pub mod prompt;
pub mod resolver;
pub mod store;
mod user_agent;

// Re-export commonly used types
pub use api::{ApiError, CivitaiClient, ModelApi};
pub use audit::{AuditError, DeletionReport, DuplicateReport, audit, delete_duplicates};
pub use config::{Category, Config, ConfigError, DownloadTarget, load_config};
pub use download::{DownloadClient, DownloadError, DownloadRunner, DownloadSummary, Downloader};
pub use organize::{OrganizeError, OrganizeSummary, Organizer, ReverseLookup};
pub use prompt::{PromptError, Prompter, TerminalPrompter};
pub use resolver::{
    ModelType, OutputLists, ResolutionPipeline, ResolutionSummary, ResolveError, UrlResolver,
};
pub use store::{AppendLog, FailureLog, ProcessedStore, StoreError};
