//! Error types for the Wonik Health core library.

use thiserror::Error;

use crate::validation::ValidationError;

/// Top-level error type for store, config and validation operations.
///
/// Parsing and knowledge-base lookups never fail, so nothing in those
/// modules produces this type.
#[derive(Error, Debug)]
pub enum WonikError {
    /// User input was rejected before reaching the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A medication identifier could not be coerced to a number.
    #[error("Invalid medication id: {0:?}")]
    InvalidId(String),

    /// No medication exists with the given identifier.
    #[error("Medication not found: {0}")]
    NotFound(crate::MedicationId),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, WonikError>;
