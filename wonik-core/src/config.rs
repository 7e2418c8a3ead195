//! Configuration for Wonik Health.
//!
//! Maps directly to `wonik.toml`. Every field has a default, so an empty
//! file (or no file at all) yields a working local setup.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WonikConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Local inference server settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Medication store settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Recommendation parsing settings.
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

impl WonikConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `WonikError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::WonikError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when `RUST_LOG` is unset: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Local inference server (Ollama) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the server.
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    /// Model used when a request does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Hard timeout for generation calls in milliseconds.
    #[serde(default = "default_40000")]
    pub generate_timeout_ms: u64,
    /// Timeout for the status probe and model listing in milliseconds.
    #[serde(default = "default_3000")]
    pub status_timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            default_model: default_model(),
            generate_timeout_ms: 40_000,
            status_timeout_ms: 3_000,
        }
    }
}

/// Medication store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Use WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            wal_mode: true,
        }
    }
}

/// Recommendation parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Upper bound on extracted tips.
    #[serde(default = "default_4")]
    pub max_tips: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self { max_tips: 4 }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_ollama_url() -> String { "http://127.0.0.1:11434".to_string() }
fn default_model() -> String { "gemma3:1b".to_string() }
fn default_db_path() -> String { "wonik_health.db".to_string() }
fn default_4() -> usize { 4 }
fn default_3000() -> u64 { 3_000 }
fn default_40000() -> u64 { 40_000 }
