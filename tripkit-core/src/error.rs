//! Error types for tripkit.

use thiserror::Error;

/// Errors that can occur in store and import operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No events found in {0}")]
    NoEvents(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rejected import file or state document, with a human-readable reason.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("File size exceeds {limit_mb}MB limit ({actual_mb:.2}MB)")]
    FileTooLarge { limit_mb: f64, actual_mb: f64 },

    #[error("Invalid file type. Allowed types: {0}")]
    InvalidFileType(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Missing or invalid field '{field}': expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
