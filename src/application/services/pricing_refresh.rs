//! # Pricing Refresh Daemon
//!
//! Background task that refreshes every known pricing location on a fixed
//! interval (default: four hours) until its cancellation token fires.
//!
//! # Example
//!
//! ```ignore
//! let shutdown = CancellationToken::new();
//! let daemon = PricingRefreshDaemon::new(Arc::clone(&cache))
//!     .with_interval(Duration::from_secs(4 * 60 * 60));
//! let handle = daemon.spawn(shutdown.clone());
//!
//! // on shutdown
//! shutdown.cancel();
//! handle.await?;
//! ```

use crate::application::services::pricing_cache::{DEFAULT_TTL_SECS, PricingCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Periodic `refresh_all` driver for a [`PricingCache`].
#[derive(Debug)]
pub struct PricingRefreshDaemon {
    cache: Arc<PricingCache>,
    interval: Duration,
    warm_on_start: bool,
}

impl PricingRefreshDaemon {
    /// Creates a daemon with the default four-hour interval.
    #[must_use]
    pub fn new(cache: Arc<PricingCache>) -> Self {
        Self {
            cache,
            interval: Duration::from_secs(DEFAULT_TTL_SECS),
            warm_on_start: false,
        }
    }

    /// Sets the refresh interval. A zero interval is raised to one second.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_secs(1));
        self
    }

    /// Refreshes every location once before the first interval elapses.
    #[must_use]
    pub fn with_warm_start(mut self, warm: bool) -> Self {
        self.warm_on_start = warm;
        self
    }

    /// Returns the refresh interval.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            warm_on_start = self.warm_on_start,
            "pricing refresh daemon starting"
        );

        let mut ticker = tokio::time::interval(self.interval);
        // First tick completes immediately.
        ticker.tick().await;

        if self.warm_on_start {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    info!("pricing refresh daemon cancelled during warm start");
                    return;
                }
                _ = self.cache.refresh_all() => {}
            }
        }

        loop {
            tokio::select! {
                biased;

                () = shutdown.cancelled() => {
                    info!("pricing refresh daemon shutting down");
                    break;
                }

                _ = ticker.tick() => {
                    let refreshed = tokio::select! {
                        biased;
                        () = shutdown.cancelled() => None,
                        report = self.cache.refresh_all() => Some(report),
                    };
                    let Some(report) = refreshed else {
                        info!("pricing refresh daemon cancelled mid-refresh");
                        break;
                    };
                    if !report.is_complete() {
                        warn!(
                            failed = report.failed.len(),
                            refreshed = report.refreshed.len(),
                            "periodic pricing refresh incomplete"
                        );
                    }
                }
            }
        }
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    #[must_use]
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::pricing_cache::PricingCacheConfig;
    use crate::domain::entities::PricingFeedRecord;
    use crate::domain::value_objects::LocationKey;
    use crate::infrastructure::pricing_feed::{InMemoryPricingFeed, PricingFeed};

    fn cache() -> (Arc<InMemoryPricingFeed>, Arc<PricingCache>) {
        let feed = Arc::new(InMemoryPricingFeed::new().with_record(
            "Toronto",
            PricingFeedRecord {
                location_name: "Toronto".to_string(),
                ..PricingFeedRecord::default()
            },
        ));
        let cache = Arc::new(PricingCache::new(
            Arc::clone(&feed) as Arc<dyn PricingFeed>,
            PricingCacheConfig::default(),
        ));
        cache.register([LocationKey::new("Toronto")]);
        (feed, cache)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_on_each_interval() {
        let (feed, cache) = cache();
        let shutdown = CancellationToken::new();
        let handle = PricingRefreshDaemon::new(cache)
            .with_interval(Duration::from_secs(60))
            .spawn(shutdown.clone());

        settle().await;
        assert_eq!(feed.total_fetches(), 0);

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(feed.total_fetches(), 1);

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(feed.total_fetches(), 2);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn warm_start_refreshes_immediately() {
        let (feed, cache) = cache();
        let shutdown = CancellationToken::new();
        let handle = PricingRefreshDaemon::new(Arc::clone(&cache))
            .with_warm_start(true)
            .spawn(shutdown.clone());

        settle().await;
        assert_eq!(feed.total_fetches(), 1);
        assert!(cache.peek(&LocationKey::new("Toronto")).is_some());

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn stops_when_cancelled() {
        let (_feed, cache) = cache();
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let handle = PricingRefreshDaemon::new(cache).spawn(shutdown);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn zero_interval_is_clamped() {
        let (_feed, cache) = cache();
        let daemon = PricingRefreshDaemon::new(cache).with_interval(Duration::ZERO);
        assert_eq!(daemon.interval(), Duration::from_secs(1));
    }
}
