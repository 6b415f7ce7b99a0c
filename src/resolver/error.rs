//! Error types for URL resolution.

use thiserror::Error;

use crate::api::ApiError;

/// Coarse classification of a resolution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorKind {
    /// The URL carries neither a model nor a version id.
    InvalidReference,
    /// The model or version does not exist, or has no versions.
    NotFound,
    /// Transport failure or non-404 error status.
    Network,
    /// The response did not have the expected shape.
    Malformed,
}

/// Errors that can occur while resolving a model page URL.
///
/// Every variant leaves the origin URL in the pending list for a later run.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither `models/<id>` nor `modelVersionId=<id>` could be extracted.
    #[error("invalid URL format: {url}")]
    InvalidReference {
        /// The origin URL.
        url: String,
    },

    /// The remote API has no usable entry for this reference.
    #[error("not found resolving {url}: {reason}")]
    NotFound {
        /// The origin URL.
        url: String,
        /// What was missing.
        reason: String,
    },

    /// The remote call failed in transit or with an error status.
    #[error("network error resolving {url}: {source}")]
    Network {
        /// The origin URL.
        url: String,
        /// The failed API call.
        #[source]
        source: ApiError,
    },

    /// The remote response could not be interpreted.
    #[error("malformed response resolving {url}: {reason}")]
    Malformed {
        /// The origin URL.
        url: String,
        /// What was wrong with the response.
        reason: String,
    },
}

impl ResolveError {
    /// Creates an invalid-reference error.
    pub fn invalid_reference(url: impl Into<String>) -> Self {
        Self::InvalidReference { url: url.into() }
    }

    /// Creates a not-found error.
    pub fn not_found(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed-response error.
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Classifies an API failure for the origin `url`.
    pub fn from_api(url: impl Into<String>, error: ApiError) -> Self {
        let url = url.into();
        match error {
            ApiError::NotFound { url: endpoint } => Self::NotFound {
                url,
                reason: format!("{endpoint} returned 404"),
            },
            ApiError::Malformed { .. } => Self::Malformed {
                reason: error.to_string(),
                url,
            },
            other => Self::Network { url, source: other },
        }
    }

    /// The failure class.
    #[must_use]
    pub fn kind(&self) -> ResolveErrorKind {
        match self {
            Self::InvalidReference { .. } => ResolveErrorKind::InvalidReference,
            Self::NotFound { .. } => ResolveErrorKind::NotFound,
            Self::Network { .. } => ResolveErrorKind::Network,
            Self::Malformed { .. } => ResolveErrorKind::Malformed,
        }
    }
}
