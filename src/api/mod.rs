//! Remote model API: endpoint layout, response types, and the [`ModelApi`] seam.
//!
//! Three JSON endpoints are consumed (by model id, by version id, by content
//! hash) and one binary endpoint (download by version id) is synthesized for
//! the downloader. Components take an `Arc<dyn ModelApi>` so tests can swap in
//! a mock server or an in-process fake.

mod client;
mod error;
mod http_client;
pub mod types;

pub use client::CivitaiClient;
pub use error::ApiError;
pub use http_client::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, build_api_http_client};
pub use types::{ModelResponse, VersionModel, VersionResponse, VersionSummary};

use async_trait::async_trait;

/// URL layout of the remote API rooted at one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base: String,
}

impl ApiEndpoints {
    /// Creates the layout for `base_url`; a trailing slash is ignored.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The host root without trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `GET` endpoint for a model and its version list.
    #[must_use]
    pub fn model_url(&self, model_id: &str) -> String {
        format!("{}/api/v1/models/{model_id}", self.base)
    }

    /// `GET` endpoint for a single version.
    #[must_use]
    pub fn version_url(&self, version_id: &str) -> String {
        format!("{}/api/v1/model-versions/{version_id}", self.base)
    }

    /// `GET` endpoint for version lookup by SHA-256 of the file.
    #[must_use]
    pub fn by_hash_url(&self, sha256: &str) -> String {
        format!("{}/api/v1/model-versions/by-hash/{sha256}", self.base)
    }

    /// Binary download endpoint for a version.
    #[must_use]
    pub fn download_url(&self, version_id: &str) -> String {
        format!("{}/api/download/models/{version_id}", self.base)
    }

    /// Public model page.
    #[must_use]
    pub fn model_page_url(&self, model_id: u64) -> String {
        format!("{}/models/{model_id}", self.base)
    }

    /// Public model page pinned to one version.
    #[must_use]
    pub fn version_page_url(&self, model_id: u64, version_id: u64) -> String {
        format!("{}?modelVersionId={version_id}", self.model_page_url(model_id))
    }
}

/// Metadata lookups against the remote model API.
///
/// # Object Safety
///
/// Uses `async_trait` so components can hold `Arc<dyn ModelApi>`.
#[async_trait]
pub trait ModelApi: Send + Sync {
    /// Endpoint layout, used to synthesize download and page URLs.
    fn endpoints(&self) -> &ApiEndpoints;

    /// Fetches a model with its version list.
    async fn fetch_model(&self, model_id: &str) -> Result<ModelResponse, ApiError>;

    /// Fetches a single version.
    async fn fetch_version(&self, version_id: &str) -> Result<VersionResponse, ApiError>;

    /// Looks a version up by the SHA-256 of one of its files.
    async fn fetch_version_by_hash(&self, sha256: &str) -> Result<VersionResponse, ApiError>;
}
