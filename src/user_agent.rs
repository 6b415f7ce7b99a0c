//! Shared User-Agent strings for download and API HTTP clients.
//!
//! Single source for project URL and UA format so download and API traffic
//! stay consistent and easy to update.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/civitai-toolkit";

/// Default User-Agent for file download requests.
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("civitai-toolkit/{version} (model-downloader; +{PROJECT_UA_URL})")
}

/// Default User-Agent for metadata API requests.
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("civitai-toolkit/{version} (metadata-lookup; +{PROJECT_UA_URL})")
}
