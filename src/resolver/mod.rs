//! URL resolution: model page URL → direct download URL + model type.
//!
//! # Architecture
//!
//! - [`ModelReference`] - identifiers pattern-matched out of a page URL
//! - [`UrlResolver`] - queries the [`ModelApi`] and synthesizes the download URL
//! - [`ResolutionPipeline`] - drains the pending list into per-type output lists
//!
//! The download URL is always built from the version id through
//! [`ApiEndpoints::download_url`](crate::api::ApiEndpoints::download_url); it is
//! never read from a response body.

mod error;
mod pipeline;
mod reference;

pub use error::{ResolveError, ResolveErrorKind};
pub use pipeline::{OutputLists, ResolutionPipeline, ResolutionSummary};
pub use reference::ModelReference;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::api::ModelApi;
use crate::store::ProcessedStore;

/// Coarse model classification used to route download URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// Full base-model weights.
    Checkpoint,
    /// Low-rank adapter weights.
    Lora,
    /// Any other or missing type.
    Unknown,
}

impl ModelType {
    /// Maps the API's `type` field. Matching is ASCII case-insensitive.
    #[must_use]
    pub fn from_api(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("checkpoint") => Self::Checkpoint,
            Some(v) if v.eq_ignore_ascii_case("lora") => Self::Lora,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Checkpoint => "Checkpoint",
            Self::Lora => "LORA",
            Self::Unknown => "unknown",
        })
    }
}

/// A page URL resolved to its binary download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    /// Synthesized download endpoint for the version.
    pub download_url: String,
    /// Routing class.
    pub model_type: ModelType,
    /// The page URL it came from.
    pub origin_url: String,
}

/// Result of a resolution attempt gated by the processed store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The URL is already recorded; no remote call was made.
    AlreadyProcessed,
    /// Freshly resolved.
    Resolved(ResolvedDownload),
}

/// Resolves page URLs through the remote model API.
#[derive(Clone)]
pub struct UrlResolver {
    api: Arc<dyn ModelApi>,
}

impl fmt::Debug for UrlResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlResolver")
            .field("base", &self.api.endpoints().base())
            .finish_non_exhaustive()
    }
}

impl UrlResolver {
    /// Creates a resolver over `api`.
    #[must_use]
    pub fn new(api: Arc<dyn ModelApi>) -> Self {
        Self { api }
    }

    /// Resolves `url` unless `processed` already contains it.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub async fn resolve_unless_processed(
        &self,
        url: &str,
        processed: &dyn ProcessedStore,
    ) -> Result<ResolveOutcome, ResolveError> {
        if processed.contains(url) {
            debug!(url, "skipping already processed URL");
            return Ok(ResolveOutcome::AlreadyProcessed);
        }
        self.resolve(url).await.map(ResolveOutcome::Resolved)
    }

    /// Resolves `url` to a download URL and model type.
    ///
    /// A version id in the URL is looked up directly; otherwise the model's
    /// first listed version is used.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when no identifier can be extracted, the model
    /// has no versions, or the remote call fails.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn resolve(&self, url: &str) -> Result<ResolvedDownload, ResolveError> {
        let reference = ModelReference::parse(url);
        let endpoints = self.api.endpoints();

        if let Some(version_id) = &reference.version_id {
            let version = self
                .api
                .fetch_version(version_id)
                .await
                .map_err(|e| ResolveError::from_api(url, e))?;
            let model_type = ModelType::from_api(version.model_type());
            debug!(version_id = %version_id, %model_type, "resolved via version endpoint");
            return Ok(ResolvedDownload {
                download_url: endpoints.download_url(version_id),
                model_type,
                origin_url: url.to_string(),
            });
        }

        let Some(model_id) = &reference.model_id else {
            return Err(ResolveError::invalid_reference(url));
        };

        let model = self
            .api
            .fetch_model(model_id)
            .await
            .map_err(|e| ResolveError::from_api(url, e))?;

        // Index 0 is assumed to be the latest version; the API does not promise it.
        let Some(first) = model.model_versions.first() else {
            return Err(ResolveError::not_found(
                url,
                format!("model {model_id} has no versions"),
            ));
        };
        let Some(version_id) = first.id else {
            return Err(ResolveError::malformed(
                url,
                format!("first version of model {model_id} has no id"),
            ));
        };

        let model_type = ModelType::from_api(model.model_type.as_deref());
        debug!(%model_id, %version_id, %model_type, "resolved via model endpoint");
        Ok(ResolvedDownload {
            download_url: endpoints.download_url(&version_id.to_string()),
            model_type,
            origin_url: url.to_string(),
        })
    }
}
