//! Error types for remote API calls.

use thiserror::Error;

/// Errors returned by the metadata API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, TLS, timeout, body read).
    #[error("network error calling {url}: {source}")]
    Network {
        /// The endpoint that was called.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered 404.
    #[error("not found: {url}")]
    NotFound {
        /// The endpoint that was called.
        url: String,
    },

    /// Any other non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The endpoint that was called.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The body could not be decoded into the expected shape.
    #[error("malformed response from {url}: {source}")]
    Malformed {
        /// The endpoint that was called.
        url: String,
        /// The JSON decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Creates a network error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Maps a non-success status to `NotFound` or `HttpStatus`.
    pub fn from_status(url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        if status == 404 {
            Self::NotFound { url }
        } else {
            Self::HttpStatus { url, status }
        }
    }

    /// Creates a malformed-body error.
    pub fn malformed(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            url: url.into(),
            source,
        }
    }
}
