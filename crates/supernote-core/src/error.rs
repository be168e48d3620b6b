//! Error types for supernote-core

use thiserror::Error;

/// Result type alias using supernote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in supernote-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Note not found (or owned by another user)
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("{0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored timestamp could not be parsed
    #[error("Invalid stored timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}
