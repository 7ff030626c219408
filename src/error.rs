//! Error types for the Critique feedback service
//!
//! This module provides structured error definitions using thiserror. The
//! binary edge uses anyhow for propagation; everything inside the library
//! returns [`CritiqueError`].

use thiserror::Error;

/// Main error type for Critique operations
#[derive(Error, Debug)]
pub enum CritiqueError {
    /// Input rejected before any generation or persistence happened
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller identity missing or malformed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// Completion provider returned an unusable response
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid record ID format
    #[error("Invalid feedback ID: {0}")]
    InvalidId(#[from] uuid::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl CritiqueError {
    /// Whether the caller caused this error (4xx) rather than the server (5xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CritiqueError::Validation(_) | CritiqueError::Unauthorized(_)
        )
    }
}

/// Result type alias for Critique operations
pub type Result<T> = std::result::Result<T, CritiqueError>;

impl From<libsql::Error> for CritiqueError {
    fn from(err: libsql::Error) -> Self {
        CritiqueError::Database(err.to_string())
    }
}

/// Convert anyhow::Error to CritiqueError
impl From<anyhow::Error> for CritiqueError {
    fn from(err: anyhow::Error) -> Self {
        CritiqueError::Other(err.to_string())
    }
}
