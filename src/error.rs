//! Error types for the curation service
//!
//! Structured error definitions with thiserror; CLI and server boundaries
//! wrap these in anyhow for propagation.

use thiserror::Error;

/// Main error type for curation operations
#[derive(Error, Debug)]
pub enum CurationError {
    /// Read/write against the persisted store failed
    #[error("Persistence error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted collection could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed feedback rejected at the submission boundary
    #[error("Invalid feedback record: {0}")]
    InvalidRecord(String),

    /// Category label outside the fixed taxonomy
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

pub type Result<T> = std::result::Result<T, CurationError>;
