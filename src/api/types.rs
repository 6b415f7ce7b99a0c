//! Response shapes for the model metadata endpoints.
//!
//! Only the fields this tool reads are declared; everything else in the
//! payload is ignored. Every field is optional because the API omits keys
//! rather than sending nulls.

use serde::Deserialize;

/// Response of `GET /api/v1/models/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    /// Model id.
    pub id: Option<u64>,
    /// Display name.
    pub name: Option<String>,
    /// Coarse model type (`Checkpoint`, `LORA`, ...).
    #[serde(rename = "type")]
    pub model_type: Option<String>,
    /// Version list, newest first as returned by the API.
    #[serde(default)]
    pub model_versions: Vec<VersionSummary>,
}

/// Entry of a model's version list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    /// Version id.
    pub id: Option<u64>,
    /// Version display name.
    pub name: Option<String>,
}

/// Response of `GET /api/v1/model-versions/{id}` and the by-hash endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    /// Version id.
    pub id: Option<u64>,
    /// Owning model id.
    pub model_id: Option<u64>,
    /// Base model family label, e.g. `SDXL 1.0`.
    pub base_model: Option<String>,
    /// Base model variant, e.g. `Standard`.
    pub base_model_type: Option<String>,
    /// Embedded summary of the owning model.
    pub model: Option<VersionModel>,
}

/// The `model` object embedded in a version response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionModel {
    /// Model display name.
    pub name: Option<String>,
    /// Coarse model type.
    #[serde(rename = "type")]
    pub model_type: Option<String>,
}

impl VersionResponse {
    /// Model type from the embedded model object, if any.
    #[must_use]
    pub fn model_type(&self) -> Option<&str> {
        self.model.as_ref()?.model_type.as_deref()
    }

    /// Model display name from the embedded model object, if any.
    #[must_use]
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref()?.name.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_version_response_reads_nested_model() {
        let raw = r#"{"id":5678,"modelId":1234,"baseModel":"SDXL 1.0","baseModelType":"Standard",
                      "model":{"name":"Neon Style","type":"LORA","nsfw":false},"files":[]}"#;
        let version: VersionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(version.id, Some(5678));
        assert_eq!(version.model_id, Some(1234));
        assert_eq!(version.base_model.as_deref(), Some("SDXL 1.0"));
        assert_eq!(version.model_type(), Some("LORA"));
        assert_eq!(version.model_name(), Some("Neon Style"));
    }

    #[test]
    fn test_model_response_missing_versions_defaults_empty() {
        let model: ModelResponse = serde_json::from_str(r#"{"id":1,"type":"Checkpoint"}"#).unwrap();
        assert!(model.model_versions.is_empty());
        assert_eq!(model.model_type.as_deref(), Some("Checkpoint"));
    }

    #[test]
    fn test_version_response_without_model_object() {
        let version: VersionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(version.model_type(), None);
        assert_eq!(version.model_name(), None);
    }
}
