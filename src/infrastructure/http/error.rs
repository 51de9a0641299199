//! # HTTP Errors
//!
//! Transport-level failures reported by [`HttpClient`](super::HttpClient).
//!
//! # Examples
//!
//! ```
//! use move_quote::infrastructure::http::HttpError;
//!
//! let error = HttpError::timeout("request timed out after 5000ms");
//! assert!(error.is_retryable());
//!
//! let error = HttpError::not_found("no such location");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error returned by HTTP calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// Request timed out.
    #[error("http timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection failure.
    #[error("http connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Remote rate limit hit.
    #[error("http rate limited: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// Credentials rejected.
    #[error("http authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Resource does not exist.
    #[error("http not found: {message}")]
    NotFound {
        /// Error message.
        message: String,
    },

    /// Any other non-success status.
    #[error("http status {status}: {message}")]
    Status {
        /// Status code.
        status: u16,
        /// Response body or summary.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("http decode error: {message}")]
    Decode {
        /// Error message.
        message: String,
    },

    /// Client could not be built.
    #[error("http internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl HttpError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if retrying the call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Authentication { .. }
            | Self::NotFound { .. }
            | Self::Decode { .. }
            | Self::Internal { .. } => false,
        }
    }

    /// Returns true for timeouts.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type for HTTP calls.
pub type HttpResult<T> = Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(HttpError::connection("reset").is_retryable());
        assert!(HttpError::rate_limited("slow down").is_retryable());
        assert!(HttpError::status(503, "down").is_retryable());
        assert!(!HttpError::status(422, "bad").is_retryable());
        assert!(!HttpError::decode("bad json").is_retryable());
        assert!(!HttpError::authentication("bad key").is_retryable());
    }

    #[test]
    fn display_includes_status() {
        assert_eq!(
            HttpError::status(418, "teapot").to_string(),
            "http status 418: teapot"
        );
    }
}
