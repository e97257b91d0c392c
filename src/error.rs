//! Custom error types for rustplos.
//!
//! This module defines all error types used throughout the crate.
//! All functions return `Result<T, PlosError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for rustplos operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum PlosError {
    /// Journal name missing from the journal directory
    #[error("Unknown journal: {0}")]
    UnknownJournal(String),

    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Search API answered with a non-2xx status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from API
        message: String,
    },

    /// Response body could not be parsed or lacks the document list
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Start or end date is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl PlosError {
    /// True for network-level failures and non-2xx responses.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, PlosError::Network(_) | PlosError::Api { .. })
    }
}

/// Result type alias using `PlosError`
pub type Result<T> = std::result::Result<T, PlosError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a malformed-response message
    fn ok_or_malformed(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_malformed(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| PlosError::MalformedResponse(msg.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failure_classification() {
        let api = PlosError::Api {
            code: 503,
            message: "unavailable".to_string(),
        };
        assert!(api.is_transport_failure());
        assert!(!PlosError::UnknownJournal("X".to_string()).is_transport_failure());
        assert!(!PlosError::MalformedResponse("x".to_string()).is_transport_failure());
    }

    #[test]
    fn test_ok_or_malformed() {
        let missing: Option<u8> = None;
        match missing.ok_or_malformed("no docs") {
            Err(PlosError::MalformedResponse(msg)) => assert_eq!(msg, "no docs"),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(Some(3).ok_or_malformed("unused").ok(), Some(3));
    }
}
