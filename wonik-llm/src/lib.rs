//! # wonik-llm — local inference for Wonik Health
//!
//! Talks to a local Ollama server:
//!   - `POST /api/generate` for a single non-streaming completion
//!   - `GET /api/tags` for model listing and the availability probe
//!
//! Every failure is reported as an [`LlmError`]; deciding what to show the
//! user instead is the caller's job.
//!
//! ```text
//! prompt::recommendation_prompt(subject)
//!        │
//!        ▼
//! Inference::invoke ──ok──▶ raw text ──▶ wonik_core::parse_recommendation
//!        │
//!        └─err─▶ LlmError { Timeout | Unreachable | MalformedResponse }
//! ```

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{Inference, OllamaClient};
pub use error::LlmError;
pub use prompt::PromptId;
pub use types::ModelInfo;
