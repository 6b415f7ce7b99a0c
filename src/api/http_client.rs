//! Shared HTTP client construction policy for metadata API calls.

use std::time::Duration;

use reqwest::Client;

use super::ApiError;
use crate::user_agent;

/// Connect timeout for metadata calls.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Read timeout for metadata calls.
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Builds the metadata API client.
///
/// # Errors
///
/// Returns [`ApiError::Client`] when the TLS backend cannot be initialized.
pub fn build_api_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .user_agent(user_agent::default_api_user_agent())
        .gzip(true)
        .build()
        .map_err(ApiError::Client)
}
