//! # In-Memory Pricing Feed
//!
//! Serves records from memory. Records can be replaced at any time, fetches
//! can be delayed or made to fail, and every fetch is counted.

use super::traits::{FeedError, FeedResult, PricingFeed};
use crate::domain::entities::PricingFeedRecord;
use crate::domain::value_objects::LocationKey;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Pricing feed over an in-memory record table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPricingFeed {
    records: Arc<RwLock<HashMap<LocationKey, PricingFeedRecord>>>,
    failing: Arc<RwLock<HashSet<LocationKey>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    fetches: Arc<DashMap<LocationKey, u64>>,
    total_fetches: Arc<AtomicU64>,
}

impl InMemoryPricingFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes or replaces the record for a location.
    pub fn publish(&self, key: impl Into<LocationKey>, record: PricingFeedRecord) {
        self.records.write().insert(key.into(), record);
    }

    /// Publishes a record and returns the feed.
    #[must_use]
    pub fn with_record(self, key: impl Into<LocationKey>, record: PricingFeedRecord) -> Self {
        self.publish(key, record);
        self
    }

    /// Removes a location's record.
    pub fn withdraw(&self, key: &LocationKey) {
        self.records.write().remove(key);
    }

    /// Makes fetches for the location fail (or succeed again).
    pub fn set_failing(&self, key: impl Into<LocationKey>, failing: bool) {
        let key = key.into();
        let mut set = self.failing.write();
        if failing {
            set.insert(key);
        } else {
            set.remove(&key);
        }
    }

    /// Delays every fetch.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    /// Fetches performed for a location.
    #[must_use]
    pub fn fetch_count(&self, key: &LocationKey) -> u64 {
        self.fetches.get(key).map_or(0, |count| *count)
    }

    /// Fetches performed across all locations.
    #[must_use]
    pub fn total_fetches(&self) -> u64 {
        self.total_fetches.load(Ordering::SeqCst)
    }

    /// Keys with a published record.
    #[must_use]
    pub fn keys(&self) -> Vec<LocationKey> {
        let mut keys: Vec<LocationKey> = self.records.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl PricingFeed for InMemoryPricingFeed {
    async fn fetch(&self, key: &LocationKey) -> FeedResult<PricingFeedRecord> {
        self.total_fetches.fetch_add(1, Ordering::SeqCst);
        *self.fetches.entry(key.clone()).or_insert(0) += 1;

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().contains(key) {
            return Err(FeedError::unavailable(format!("injected failure for {key}")));
        }
        self.records
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| FeedError::unknown_location(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(name: &str) -> PricingFeedRecord {
        PricingFeedRecord {
            location_name: name.to_string(),
            ..PricingFeedRecord::default()
        }
    }

    #[tokio::test]
    async fn serves_published_records() {
        let feed = InMemoryPricingFeed::new().with_record("Toronto", record("Toronto"));
        let key = LocationKey::new("Toronto");
        assert_eq!(feed.fetch(&key).await.unwrap().location_name, "Toronto");
        assert_eq!(feed.fetch_count(&key), 1);
        assert_eq!(feed.keys(), vec![key.clone()]);

        feed.withdraw(&key);
        assert!(matches!(
            feed.fetch(&key).await,
            Err(FeedError::UnknownLocation { .. })
        ));
        assert_eq!(feed.total_fetches(), 2);
    }

    #[tokio::test]
    async fn injected_failure_and_recovery() {
        let feed = InMemoryPricingFeed::new().with_record("Toronto", record("Toronto"));
        let key = LocationKey::new("Toronto");
        feed.set_failing("Toronto", true);
        assert!(feed.fetch(&key).await.unwrap_err().is_retryable());
        feed.set_failing("Toronto", false);
        assert!(feed.fetch(&key).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn delay_applies() {
        let feed = InMemoryPricingFeed::new().with_record("Toronto", record("Toronto"));
        feed.set_delay(Some(Duration::from_secs(3)));
        let started = tokio::time::Instant::now();
        feed.fetch(&LocationKey::new("Toronto")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
    }
}
