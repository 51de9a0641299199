//! Publisher that writes a structured log line per batch.

use super::traits::{PublishResult, QuoteResultPublisher};
use crate::domain::entities::{QuoteRequest, QuoteResult};
use async_trait::async_trait;
use tracing::info;

/// Logs each batch at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingQuotePublisher;

#[async_trait]
impl QuoteResultPublisher for LoggingQuotePublisher {
    async fn publish(&self, request: &QuoteRequest, quotes: &[QuoteResult]) -> PublishResult<()> {
        let priced = quotes.iter().filter(|q| q.is_quoted()).count();
        let cheapest = quotes.iter().filter_map(QuoteResult::total_cost).min();
        info!(
            request_id = %request.id,
            quotes = quotes.len(),
            priced,
            cheapest = ?cheapest,
            "quote batch published"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn always_succeeds() {
        let request = QuoteRequest::new(
            "Toronto",
            "Ajax",
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            1,
        );
        assert!(LoggingQuotePublisher.publish(&request, &[]).await.is_ok());
    }
}
