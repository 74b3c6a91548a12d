//! Error types for gridwatch.
//!
//! This module defines all error types used throughout the gridwatch crate,
//! providing detailed context for debugging and user-friendly error messages.

use thiserror::Error;

/// The main error type for gridwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    /// The HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the API (or the raw body).
        message: String,
    },

    /// The requested resource does not exist.
    #[error("not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// An operation timed out.
    #[error("operation timed out: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
    },

    /// The operation was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// A session type code was not recognised.
    #[error("unknown session type '{code}' (expected one of R, Q, S, FP1, FP2, FP3)")]
    InvalidSessionType {
        /// The offending code.
        code: String,
    },

    // === I/O Errors ===
    /// File system or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for gridwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a not-found error for the given resource.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a timeout error for the given operation.
    #[must_use]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create an API status error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Check if this error means the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a timeout, whether enforced locally or by the HTTP client.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// Check if this error is a cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Cancelled;
        assert_eq!(err.to_string(), "operation cancelled");

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::api(500, "session not loaded");
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("session not loaded"));
    }

    #[test]
    fn test_not_found() {
        let err = Error::not_found("results for round 4");
        assert!(err.is_not_found());
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("round 4"));
    }

    #[test]
    fn test_timeout() {
        let err = Error::timeout("results for round 1");
        assert!(err.is_timeout());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_is_cancelled() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::internal("x").is_cancelled());
    }

    #[test]
    fn test_invalid_session_type_display() {
        let err = Error::InvalidSessionType {
            code: "FP4".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("FP4"));
        assert!(msg.contains("FP3"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "base_url must not be empty".to_string(),
        };
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
