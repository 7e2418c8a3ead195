//! Wire types for the Ollama HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    /// Model tag, e.g. `gemma3:1b`.
    pub model: &'a str,
    /// Full prompt text.
    pub prompt: &'a str,
    /// Always `false`: the adapter buffers one complete answer.
    pub stream: bool,
}

/// The part of a `/api/generate` reply the adapter reads.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Generated text.
    pub response: String,
}

/// Reply of `GET /api/tags`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsResponse {
    /// Installed models.
    #[serde(default)]
    pub models: Vec<TagModel>,
}

/// One installed model as reported by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct TagModel {
    /// Model tag.
    pub name: String,
    /// Optional model details.
    #[serde(default)]
    pub details: Option<TagDetails>,
}

/// Model details; only the parameter size is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagDetails {
    /// Human-readable parameter count, e.g. `"1B"`.
    #[serde(default)]
    pub parameter_size: Option<String>,
}

/// A model offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model tag.
    pub name: String,
    /// Parameter size label, `"Unknown"` if not reported.
    pub size: String,
}

impl From<TagModel> for ModelInfo {
    fn from(model: TagModel) -> Self {
        let size = model
            .details
            .and_then(|d| d.parameter_size)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        Self {
            name: model.name,
            size,
        }
    }
}
