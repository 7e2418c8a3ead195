//! Inference adapter error types.

use thiserror::Error;

/// Why a call to the inference server produced no text.
///
/// Callers are expected to fall back to offline data on any variant; the
/// distinction exists for logging.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The call did not finish within its timeout and was aborted.
    #[error("Inference request timed out after {0}ms")]
    Timeout(u64),

    /// The server could not be reached or dropped the connection.
    #[error("Inference server unreachable: {0}")]
    Unreachable(String),

    /// The server answered, but not with a `{"response": "..."}` object.
    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Classify a transport error for a call made with `timeout_ms`.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout_ms)
        } else if err.is_decode() {
            LlmError::MalformedResponse(err.to_string())
        } else {
            LlmError::Unreachable(err.to_string())
        }
    }
}
