//! # Pricing Feed Port

use crate::domain::entities::PricingFeedRecord;
use crate::domain::value_objects::LocationKey;
use crate::infrastructure::http::HttpError;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error returned by the pricing feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The feed has no record for the location.
    #[error("no pricing published for location {key}")]
    UnknownLocation {
        /// Location key.
        key: String,
    },

    /// The feed did not answer in time.
    #[error("pricing feed timed out: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// The feed failed.
    #[error("pricing feed unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// The record could not be decoded.
    #[error("malformed pricing record: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },
}

impl FeedError {
    /// Creates an unknown location error.
    #[must_use]
    pub fn unknown_location(key: &LocationKey) -> Self {
        Self::UnknownLocation {
            key: key.to_string(),
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

    /// Creates a malformed record error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Returns true if a later fetch may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable { .. })
    }
}

impl From<HttpError> for FeedError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Timeout { message } => Self::timeout(message),
            HttpError::Decode { message } => Self::malformed(message),
            other => Self::unavailable(other.to_string()),
        }
    }
}

/// Result type for feed fetches.
pub type FeedResult<T> = Result<T, FeedError>;

/// Source of normalized pricing records.
#[async_trait]
pub trait PricingFeed: Send + Sync + fmt::Debug {
    /// Fetches the current record for a location.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] when the location is unknown or the feed
    /// fails.
    async fn fetch(&self, key: &LocationKey) -> FeedResult<PricingFeedRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_http_errors() {
        assert!(matches!(
            FeedError::from(HttpError::decode("bad")),
            FeedError::Malformed { .. }
        ));
        assert!(FeedError::from(HttpError::timeout("slow")).is_retryable());
        assert!(!FeedError::unknown_location(&LocationKey::new("x")).is_retryable());
    }
}
