//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use civitai_core::{CivitaiClient, Config, ModelApi};
use wiremock::MockServer;

/// API client pointed at the mock server.
pub fn api_for(server: &MockServer) -> Arc<dyn ModelApi> {
    Arc::new(CivitaiClient::new(&server.uri()).expect("build API client"))
}

/// Default layout rooted at `workspace`, talking to the mock server.
pub fn config_for(workspace: &Path, server: &MockServer) -> Config {
    let mut config = Config::with_workspace(workspace);
    config.api_base_url = server.uri();
    config
}

/// Non-empty trimmed lines of a text file; empty when the file is absent.
pub fn lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
