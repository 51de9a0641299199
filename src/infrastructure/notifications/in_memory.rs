//! Publisher that keeps every batch in memory.

use super::traits::{PublishError, PublishResult, QuoteResultPublisher};
use crate::domain::entities::{QuoteRequest, QuoteResult};
use crate::domain::value_objects::RequestId;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Records published batches; can be switched into failure mode.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuotePublisher {
    batches: Arc<Mutex<Vec<(RequestId, Vec<QuoteResult>)>>>,
    failing: Arc<AtomicBool>,
    published: Arc<Notify>,
}

impl InMemoryQuotePublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every publish fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Batches received so far.
    #[must_use]
    pub fn batches(&self) -> Vec<(RequestId, Vec<QuoteResult>)> {
        self.batches.lock().clone()
    }

    /// Waits until the next batch is published.
    pub async fn wait_for_batch(&self) {
        self.published.notified().await;
    }
}

#[async_trait]
impl QuoteResultPublisher for InMemoryQuotePublisher {
    async fn publish(&self, request: &QuoteRequest, quotes: &[QuoteResult]) -> PublishResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::failed("publisher in failure mode"));
        }
        self.batches.lock().push((request.id, quotes.to_vec()));
        self.published.notify_one();
        Ok(())
    }
}
