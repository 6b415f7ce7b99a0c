//! [`CivitaiClient`]: the HTTP implementation of [`ModelApi`].

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::http_client::build_api_http_client;
use super::types::{ModelResponse, VersionResponse};
use super::{ApiEndpoints, ApiError, ModelApi};

/// Metadata client for the Civitai REST API.
///
/// Created once per run and shared behind an `Arc<dyn ModelApi>`.
#[derive(Debug, Clone)]
pub struct CivitaiClient {
    client: Client,
    endpoints: ApiEndpoints,
}

impl CivitaiClient {
    /// Creates a client against `base_url` (e.g. `https://civitai.com`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_api_http_client()?,
            endpoints: ApiEndpoints::new(base_url),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!(api_url = %url, "calling model API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "model API returned error status");
            return Err(ApiError::from_status(url, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(url, e))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::malformed(url, e))
    }
}

#[async_trait]
impl ModelApi for CivitaiClient {
    fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    #[instrument(skip(self), fields(model_id = %model_id))]
    async fn fetch_model(&self, model_id: &str) -> Result<ModelResponse, ApiError> {
        self.get_json(&self.endpoints.model_url(model_id)).await
    }

    #[instrument(skip(self), fields(version_id = %version_id))]
    async fn fetch_version(&self, version_id: &str) -> Result<VersionResponse, ApiError> {
        self.get_json(&self.endpoints.version_url(version_id)).await
    }

    #[instrument(skip(self), fields(hash = %sha256))]
    async fn fetch_version_by_hash(&self, sha256: &str) -> Result<VersionResponse, ApiError> {
        self.get_json(&self.endpoints.by_hash_url(sha256)).await
    }
}
