//! # HTTP Pricing Feed
//!
//! Reads normalized records from the ingestion service:
//! `GET {base}/pricing?location={key}` returns one
//! [`PricingFeedRecord`] as JSON; 404 means the location publishes nothing.

use super::traits::{FeedError, FeedResult, PricingFeed};
use crate::domain::entities::PricingFeedRecord;
use crate::domain::value_objects::LocationKey;
use crate::infrastructure::http::{HttpClient, HttpError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Pricing feed backed by the ingestion service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPricingFeed {
    client: HttpClient,
    base_url: String,
}

impl HttpPricingFeed {
    /// Creates a feed client.
    #[must_use]
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint serving pricing records.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/pricing", self.base_url)
    }
}

#[async_trait]
impl PricingFeed for HttpPricingFeed {
    #[instrument(skip(self), fields(location = %key))]
    async fn fetch(&self, key: &LocationKey) -> FeedResult<PricingFeedRecord> {
        let record: PricingFeedRecord = self
            .client
            .get_with_params(&self.endpoint(), &[("location", key.as_str())])
            .await
            .map_err(|e| match e {
                HttpError::NotFound { .. } => FeedError::unknown_location(key),
                other => FeedError::from(other),
            })?;

        debug!(
            day_rates = record.day_rates.len(),
            crew_rates = record.crew_rate_table.len(),
            "pricing record received"
        );
        Ok(record)
    }
}
