//! Typed errors for the pipeline library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Note that most pipeline components deliberately do *not* return these
//! errors to their callers: classification, extraction, and routing degrade
//! to their deterministic tier instead. The error types here flow between
//! collaborators (AI backend, listing store) and the strategies that wrap
//! them.

use thiserror::Error;

/// Errors from the model backend collaborator.
#[derive(Debug, Error)]
pub enum AiError {
    /// Request to the backend failed (transport, timeout, rate limit)
    #[error("AI request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response arrived but could not be decoded into the expected shape
    #[error("malformed AI response: {0}")]
    MalformedResponse(String),

    /// No backend is configured
    #[error("AI backend not configured")]
    NotConfigured,
}

/// Errors from the external listing-storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport-level failure (connection refused, timeout, DNS)
    #[error("storage transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success HTTP status from the storage service
    #[error("storage returned status {code}")]
    Status { code: u16 },

    /// Response body did not match the expected shape
    #[error("malformed storage response: {0}")]
    MalformedResponse(String),
}

impl StorageError {
    /// Whether a create call that failed this way should be retried.
    ///
    /// Transport failures and HTTP 429 are retryable; any other status is
    /// terminal and reported immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { code: 429 })
    }
}

/// Errors that can surface from library configuration or plumbing.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// AI service unavailable or failed
    #[error("AI service error: {0}")]
    Ai(#[from] AiError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for AI backend operations.
pub type AiResult<T> = std::result::Result<T, AiError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        let err = StorageError::Transport(Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert!(err.is_retryable());
    }

    #[test]
    fn rate_limit_is_retryable_other_statuses_are_not() {
        assert!(StorageError::Status { code: 429 }.is_retryable());
        assert!(!StorageError::Status { code: 404 }.is_retryable());
        assert!(!StorageError::Status { code: 500 }.is_retryable());
    }
}
