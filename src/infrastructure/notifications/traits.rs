//! # Publisher Port

use crate::domain::entities::{QuoteRequest, QuoteResult};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error returned by a publisher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The downstream service rejected or dropped the batch.
    #[error("publish failed: {0}")]
    Failed(String),
}

impl PublishError {
    /// Creates a failure.
    #[must_use]
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Result type for publishing.
pub type PublishResult<T> = Result<T, PublishError>;

/// Receives every completed quote batch.
#[async_trait]
pub trait QuoteResultPublisher: Send + Sync + fmt::Debug {
    /// Publishes the results generated for a request.
    ///
    /// # Errors
    ///
    /// Returns a [`PublishError`] if the downstream service fails. Callers
    /// only log it.
    async fn publish(&self, request: &QuoteRequest, quotes: &[QuoteResult]) -> PublishResult<()>;
}
