//! Error types for the bibliorec library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`RecommenderError`] enum. Degraded-signal conditions (missing
//! interaction logs, unresolved liked titles, empty filter results,
//! unavailable ANN engines) are deliberately *not* errors: each has a
//! well-defined fallback documented on the component that handles it.

use std::io;

use thiserror::Error;

/// The main error type for bibliorec operations.
#[derive(Error, Debug)]
pub enum RecommenderError {
    /// Configuration errors (catalog missing or structurally invalid).
    /// Fatal: blocks initialization.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request arrived before initialization completed. Recoverable:
    /// the caller retries once an engine has been installed.
    #[error("Recommender not ready: {0}")]
    NotReady(String),

    /// Malformed request shape. Surfaced to the caller, not retried.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing errors while reading tabular sources.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error for other cases.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`RecommenderError`].
pub type Result<T> = std::result::Result<T, RecommenderError>;

impl RecommenderError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        RecommenderError::Config(msg.into())
    }

    /// Create a new not-ready error.
    pub fn not_ready<S: Into<String>>(msg: S) -> Self {
        RecommenderError::NotReady(msg.into())
    }

    /// Create a new invalid-request error.
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        RecommenderError::InvalidRequest(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        RecommenderError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = RecommenderError::config("books.csv not found");
        assert_eq!(
            error.to_string(),
            "Configuration error: books.csv not found"
        );

        let error = RecommenderError::not_ready("models not fitted");
        assert_eq!(
            error.to_string(),
            "Recommender not ready: models not fitted"
        );

        let error = RecommenderError::invalid_request("limit must be positive");
        assert_eq!(error.to_string(), "Invalid request: limit must be positive");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = RecommenderError::from(io_error);

        match error {
            RecommenderError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
