//! Error types for meishi-core

use thiserror::Error;

/// Main error type shared by the meishi crates
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the failure came from a collaborator rather than from the caller's input.
    ///
    /// Screens treat these as transient and let the user retry.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable(_) | Self::Database(_) | Self::Io(_)
        )
    }
}

/// Result type alias for meishi-core
pub type Result<T> = std::result::Result<T, Error>;
