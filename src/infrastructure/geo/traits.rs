//! # Geo Resolver Port
//!
//! Geocoding and driving-route lookups. Callers treat every failure as
//! "metric unavailable" rather than a fatal error.

use crate::domain::value_objects::{GeoPoint, RouteMetrics};
use crate::infrastructure::http::HttpError;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error returned by geo lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    /// Address or route could not be resolved.
    #[error("not found: {query}")]
    NotFound {
        /// The address or route that failed.
        query: String,
    },

    /// The lookup took too long.
    #[error("geo lookup timed out: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// The provider failed or returned garbage.
    #[error("geo provider unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

impl GeoError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns true if a later attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}

impl From<HttpError> for GeoError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::NotFound { message } => Self::not_found(message),
            HttpError::Timeout { message } => Self::timeout(message),
            other => Self::unavailable(other.to_string()),
        }
    }
}

/// Result type for geo lookups.
pub type GeoResult<T> = Result<T, GeoError>;

/// External geocoding and routing capability.
#[async_trait]
pub trait GeoResolver: Send + Sync + fmt::Debug {
    /// Resolves an address to a coordinate.
    ///
    /// # Errors
    ///
    /// Returns `GeoError::NotFound` for unknown addresses, or another
    /// [`GeoError`] when the provider fails.
    async fn geocode(&self, address: &str) -> GeoResult<GeoPoint>;

    /// Driving distance and duration between two addresses.
    ///
    /// # Errors
    ///
    /// Returns `GeoError::NotFound` when no route exists, or another
    /// [`GeoError`] when the provider fails.
    async fn route(&self, from: &str, to: &str) -> GeoResult<RouteMetrics>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_http_errors() {
        assert_eq!(
            GeoError::from(HttpError::not_found("nowhere")),
            GeoError::not_found("nowhere")
        );
        assert!(matches!(
            GeoError::from(HttpError::timeout("slow")),
            GeoError::Timeout { .. }
        ));
        assert!(matches!(
            GeoError::from(HttpError::status(500, "boom")),
            GeoError::Unavailable { .. }
        ));
    }

    #[test]
    fn not_found_is_final() {
        assert!(!GeoError::not_found("x").is_retryable());
        assert!(GeoError::unavailable("x").is_retryable());
    }
}
