//! Identifier extraction from model page URLs.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static MODEL_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"models/(\d+)").expect("model id regex is valid"));

#[allow(clippy::expect_used)]
static VERSION_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"modelVersionId=(\d+)").expect("version id regex is valid"));

/// Identifiers pattern-matched out of a source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReference {
    /// The URL as it appeared in the pending list.
    pub source_url: String,
    /// Digits following `models/`.
    pub model_id: Option<String>,
    /// Digits following `modelVersionId=`.
    pub version_id: Option<String>,
}

impl ModelReference {
    /// Extracts both identifiers; either may be absent.
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let capture = |pattern: &Regex| {
            pattern
                .captures(url)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        };
        Self {
            source_url: url.to_string(),
            model_id: capture(&MODEL_ID_PATTERN),
            version_id: capture(&VERSION_ID_PATTERN),
        }
    }

    /// True when at least one identifier is present.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        self.model_id.is_some() || self.version_id.is_some()
    }
}
