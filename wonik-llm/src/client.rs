//! Ollama HTTP client and the `Inference` seam the advisor is written against.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::error::LlmError;
use crate::types::{GenerateRequest, GenerateResponse, ModelInfo, TagsResponse};

/// Default server address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

/// Default hard timeout for generation calls.
pub const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(40);

/// Default timeout for the status probe and model listing.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Longest slice of a bad body quoted in an error message.
const BODY_SNIPPET_CHARS: usize = 200;

/// Something that can turn a prompt into text.
///
/// Implemented by [`OllamaClient`]; tests drive the orchestrator with
/// in-process doubles instead.
pub trait Inference: Send + Sync {
    /// Generate a complete answer for `prompt` with `model`. One attempt.
    fn invoke(&self, prompt: &str, model: &str) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Installed models; empty on any error.
    fn list_models(&self) -> impl Future<Output = Vec<ModelInfo>> + Send;

    /// Whether the server answers `200 OK`; `false` on any error.
    fn probe_status(&self) -> impl Future<Output = bool> + Send;
}

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
    generate_timeout: Duration,
    status_timeout: Duration,
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl OllamaClient {
    /// Create a client for the server at `base_url` with default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            generate_timeout: DEFAULT_GENERATE_TIMEOUT,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
        }
    }

    /// Set the generation timeout.
    #[must_use]
    pub fn with_generate_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = timeout;
        self
    }

    /// Set the probe / listing timeout.
    #[must_use]
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    /// Server base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/generate` with `stream: false`.
    ///
    /// # Errors
    ///
    /// [`LlmError::Timeout`] when the call exceeds the generation timeout,
    /// [`LlmError::Unreachable`] on transport failure, and
    /// [`LlmError::MalformedResponse`] when the body is not a
    /// `{"response": "..."}` object.
    pub async fn generate(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let timeout_ms = u64::try_from(self.generate_timeout.as_millis()).unwrap_or(u64::MAX);
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        debug!(%url, model, prompt_chars = prompt.chars().count(), "Calling Ollama generate");
        let start = Instant::now();

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .timeout(self.generate_timeout)
            .send()
            .await
            .map_err(|e| {
                let err = LlmError::from_transport(&e, timeout_ms);
                warn!(model, error = %err, "Ollama request failed");
                err
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            let err = LlmError::from_transport(&e, timeout_ms);
            warn!(model, error = %err, "Reading Ollama response failed");
            err
        })?;

        if !status.is_success() {
            warn!(model, %status, "Ollama returned an error status");
            return Err(LlmError::MalformedResponse(format!(
                "HTTP {status}: {}",
                snippet(&text)
            )));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            warn!(model, error = %e, "Ollama body is not a generate response");
            LlmError::MalformedResponse(format!("{e}; raw body: '{}'", snippet(&text)))
        })?;

        info!(
            model,
            latency_ms = start.elapsed().as_millis(),
            chars = parsed.response.chars().count(),
            "Ollama response received"
        );
        Ok(parsed.response)
    }

    /// `GET /api/tags`, mapped to [`ModelInfo`]. Empty on any error.
    pub async fn models(&self) -> Vec<ModelInfo> {
        let url = format!("{}/api/tags", self.base_url);
        let result: Result<TagsResponse, reqwest::Error> = async {
            let resp = self
                .http
                .get(&url)
                .timeout(self.status_timeout)
                .send()
                .await?
                .error_for_status()?;
            resp.json::<TagsResponse>().await
        }
        .await;

        match result {
            Ok(tags) => tags.models.into_iter().map(ModelInfo::from).collect(),
            Err(e) => {
                warn!(error = %e, "Listing Ollama models failed");
                Vec::new()
            }
        }
    }

    /// `true` only when `GET /api/tags` answers `200 OK` within the status timeout.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.http.get(&url).timeout(self.status_timeout).send().await {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(e) => {
                debug!(error = %e, "Ollama status probe failed");
                false
            }
        }
    }
}

impl Inference for OllamaClient {
    async fn invoke(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
        self.generate(prompt, model).await
    }

    async fn list_models(&self) -> Vec<ModelInfo> {
        self.models().await
    }

    async fn probe_status(&self) -> bool {
        self.is_available().await
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(BODY_SNIPPET_CHARS).collect()
}
