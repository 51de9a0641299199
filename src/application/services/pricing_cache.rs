//! # Pricing Cache
//!
//! TTL cache of normalized [`PricingSnapshot`]s, one slot per location key.
//!
//! # Consistency
//!
//! - An entry is served only while `now - fetched_at < ttl`. An expired or
//!   missing entry is fetched synchronously; a failed fetch is an error,
//!   never a stale snapshot.
//! - Each slot holds `Option<Arc<CacheEntry>>` behind a short read/write
//!   lock. A refresh builds the new entry completely and swaps the `Arc`, so
//!   readers see the old snapshot or the new one, never a mix.
//! - Fetches for one key are serialized by a per-slot async mutex. Callers
//!   that queue behind an in-flight fetch take its outcome once they acquire
//!   the mutex: the freshly installed entry, or the error it failed with. N
//!   concurrent misses cost a single upstream fetch whether it succeeds or
//!   not. Different keys never contend.
//! - Failures are shared only with callers that were waiting on that attempt;
//!   the next caller to arrive fetches again.
//! - A fetch whose caller is dropped (deadline, abort) releases the slot
//!   mutex with the dropped future.
//!
//! # Examples
//!
//! ```ignore
//! let cache = PricingCache::new(feed, PricingCacheConfig::default());
//! cache.register([LocationKey::new("Toronto")]);
//!
//! let snapshot = cache.get(&LocationKey::new("Toronto")).await?;
//! let report = cache.refresh_all().await;
//! ```

use crate::application::error::PricingError;
use crate::domain::entities::PricingSnapshot;
use crate::domain::value_objects::{LocationKey, Timestamp};
use crate::infrastructure::pricing_feed::{FeedError, PricingFeed};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Default entry lifetime: four hours.
pub const DEFAULT_TTL_SECS: u64 = 4 * 60 * 60;

/// Default upper bound on a single feed fetch.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

// ============================================================================
// Configuration
// ============================================================================

/// Pricing cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingCacheConfig {
    /// Entry lifetime.
    pub ttl: Duration,
    /// Upper bound on a single feed fetch.
    pub fetch_timeout: Duration,
}

impl Default for PricingCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }
}

impl PricingCacheConfig {
    /// Creates a configuration with the given TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    /// Sets the fetch timeout.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

// ============================================================================
// Entries
// ============================================================================

/// A snapshot together with when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    key: LocationKey,
    snapshot: Arc<PricingSnapshot>,
    fetched_at: Timestamp,
    fetched_instant: Instant,
}

impl CacheEntry {
    fn new(key: LocationKey, snapshot: PricingSnapshot) -> Self {
        Self {
            key,
            snapshot: Arc::new(snapshot),
            fetched_at: Timestamp::now(),
            fetched_instant: Instant::now(),
        }
    }

    /// Location key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &LocationKey {
        &self.key
    }

    /// The cached snapshot.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &Arc<PricingSnapshot> {
        &self.snapshot
    }

    /// Wall-clock fetch time.
    #[inline]
    #[must_use]
    pub fn fetched_at(&self) -> Timestamp {
        self.fetched_at
    }

    /// Time since the fetch.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.fetched_instant.elapsed()
    }

    /// Returns true while the entry is younger than `ttl`.
    #[must_use]
    pub fn is_valid(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

#[derive(Debug, Default)]
struct Slot {
    fetch_lock: tokio::sync::Mutex<()>,
    entry: parking_lot::RwLock<Option<Arc<CacheEntry>>>,
    // Completed fetch attempts, bumped while `fetch_lock` is held.
    attempts: AtomicU64,
    last_failure: parking_lot::Mutex<Option<PricingError>>,
}

impl Slot {
    fn current(&self) -> Option<Arc<CacheEntry>> {
        self.entry.read().clone()
    }

    fn valid(&self, ttl: Duration) -> Option<Arc<CacheEntry>> {
        self.current().filter(|entry| entry.is_valid(ttl))
    }

    fn install(&self, entry: Arc<CacheEntry>) {
        *self.entry.write() = Some(entry);
    }

    fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Acquire)
    }

    /// Records a finished attempt. Must be called with `fetch_lock` held.
    fn complete(&self, result: &Result<Arc<CacheEntry>, PricingError>) {
        match result {
            Ok(entry) => {
                self.install(Arc::clone(entry));
                *self.last_failure.lock() = None;
            }
            Err(error) => *self.last_failure.lock() = Some(error.clone()),
        }
        self.attempts.fetch_add(1, Ordering::Release);
    }

    /// Failure of an attempt that finished after `seen` was read.
    fn failure_since(&self, seen: u64) -> Option<PricingError> {
        if self.attempts() == seen {
            return None;
        }
        self.last_failure.lock().clone()
    }

    fn clear(&self) -> bool {
        self.entry.write().take().is_some()
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Outcome of [`PricingCache::refresh_all`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshReport {
    /// Keys refreshed successfully.
    pub refreshed: Vec<LocationKey>,
    /// Keys whose refresh failed, with the error message.
    pub failed: Vec<RefreshFailure>,
}

impl RefreshReport {
    /// Returns true when every key refreshed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// One failed refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshFailure {
    /// Location key.
    pub location_key: LocationKey,
    /// Error message.
    pub error: String,
}

/// Status of one cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryStatus {
    /// Whether a snapshot is cached.
    pub entry_present: bool,
    /// Whether the cached snapshot is still within its TTL.
    pub valid: bool,
    /// Seconds since the fetch.
    pub age_secs: Option<u64>,
    /// When the snapshot was fetched.
    pub fetched_at: Option<Timestamp>,
    /// Number of day rates in the snapshot.
    pub day_rate_count: Option<usize>,
}

/// Status of the whole cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
    /// Per-location status, ordered by key.
    pub entries: BTreeMap<LocationKey, EntryStatus>,
}

/// Cumulative cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// `get` calls answered from a valid entry.
    pub hits: u64,
    /// `get` calls that waited on another caller's fetch.
    pub coalesced: u64,
    /// Upstream fetches started.
    pub fetches: u64,
    /// Upstream fetches that failed.
    pub fetch_failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    coalesced: AtomicU64,
    fetches: AtomicU64,
    fetch_failures: AtomicU64,
}

// ============================================================================
// Cache
// ============================================================================

/// Per-location TTL cache over a [`PricingFeed`].
#[derive(Debug)]
pub struct PricingCache {
    feed: Arc<dyn PricingFeed>,
    config: PricingCacheConfig,
    slots: DashMap<LocationKey, Arc<Slot>>,
    counters: Counters,
}

impl PricingCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(feed: Arc<dyn PricingFeed>, config: PricingCacheConfig) -> Self {
        Self {
            feed,
            config,
            slots: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PricingCacheConfig {
        &self.config
    }

    /// Registers keys so they appear in status reports and `refresh_all`
    /// before their first `get`.
    pub fn register<I>(&self, keys: I)
    where
        I: IntoIterator<Item = LocationKey>,
    {
        for key in keys {
            self.slots.entry(key).or_default();
        }
    }

    /// Every key known to the cache, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<LocationKey> {
        let mut keys: Vec<LocationKey> = self.slots.iter().map(|s| s.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Returns true if the key has been registered or requested.
    #[must_use]
    pub fn is_known(&self, key: &LocationKey) -> bool {
        self.slots.contains_key(key)
    }

    fn slot(&self, key: &LocationKey) -> Arc<Slot> {
        if let Some(slot) = self.slots.get(key) {
            return Arc::clone(slot.value());
        }
        Arc::clone(self.slots.entry(key.clone()).or_default().value())
    }

    /// Returns the current entry without fetching, valid or not.
    #[must_use]
    pub fn peek(&self, key: &LocationKey) -> Option<Arc<CacheEntry>> {
        self.slots.get(key).and_then(|slot| slot.current())
    }

    /// Returns a valid snapshot, fetching it if the entry is missing or
    /// expired.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the fetch fails, times out or the record
    /// cannot be normalized. Nothing is installed in that case, and callers
    /// that were waiting on the same fetch receive the same error.
    #[instrument(skip(self), fields(location = %key))]
    pub async fn get(&self, key: &LocationKey) -> Result<Arc<PricingSnapshot>, PricingError> {
        let slot = self.slot(key);
        if let Some(entry) = slot.valid(self.config.ttl) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(entry.snapshot()));
        }

        let seen = slot.attempts();
        let _guard = slot.fetch_lock.lock().await;
        if let Some(entry) = slot.valid(self.config.ttl) {
            self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
            debug!("reusing snapshot fetched by a concurrent caller");
            return Ok(Arc::clone(entry.snapshot()));
        }
        if let Some(error) = slot.failure_since(seen) {
            self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
            debug!(%error, "sharing failure of a concurrent fetch");
            return Err(error);
        }

        let result = self.fetch(key).await;
        slot.complete(&result);
        result.map(|entry| Arc::clone(entry.snapshot()))
    }

    /// Fetches and installs a new snapshot regardless of the current entry's
    /// age.
    ///
    /// On failure the previous entry, if any, is left in place and keeps
    /// expiring on its own schedule.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the fetch or normalization fails.
    #[instrument(skip(self), fields(location = %key))]
    pub async fn refresh(&self, key: &LocationKey) -> Result<Arc<CacheEntry>, PricingError> {
        let slot = self.slot(key);
        let _guard = slot.fetch_lock.lock().await;
        let result = self.fetch(key).await;
        slot.complete(&result);
        result
    }

    /// Refreshes every known key concurrently.
    ///
    /// Safe to run alongside `get`: readers of other keys are never blocked
    /// and readers of a refreshing key see the old or the new snapshot.
    pub async fn refresh_all(&self) -> RefreshReport {
        let keys = self.keys();
        let results = futures::future::join_all(keys.iter().map(|key| async move {
            (key.clone(), self.refresh(key).await)
        }))
        .await;

        let mut report = RefreshReport::default();
        for (key, result) in results {
            match result {
                Ok(_) => report.refreshed.push(key),
                Err(error) => report.failed.push(RefreshFailure {
                    location_key: key,
                    error: error.to_string(),
                }),
            }
        }
        info!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            "pricing cache refresh complete"
        );
        report
    }

    /// Drops the entry for a key; the next `get` fetches.
    ///
    /// Returns true if an entry was present.
    pub fn invalidate(&self, key: &LocationKey) -> bool {
        let removed = self.slots.get(key).is_some_and(|slot| slot.clear());
        debug!(location = %key, removed, "pricing entry invalidated");
        removed
    }

    /// Drops every entry; keys stay registered.
    pub fn invalidate_all(&self) {
        for slot in self.slots.iter() {
            slot.clear();
        }
        info!(locations = self.slots.len(), "pricing cache invalidated");
    }

    /// Reports every known key.
    #[must_use]
    pub fn status(&self) -> CacheStatus {
        let ttl = self.config.ttl;
        let entries = self
            .slots
            .iter()
            .map(|slot| {
                let status = match slot.current() {
                    Some(entry) => EntryStatus {
                        entry_present: true,
                        valid: entry.is_valid(ttl),
                        age_secs: Some(entry.age().as_secs()),
                        fetched_at: Some(entry.fetched_at()),
                        day_rate_count: Some(entry.snapshot().day_rates().len()),
                    },
                    None => EntryStatus {
                        entry_present: false,
                        valid: false,
                        age_secs: None,
                        fetched_at: None,
                        day_rate_count: None,
                    },
                };
                (slot.key().clone(), status)
            })
            .collect();
        CacheStatus {
            ttl_secs: ttl.as_secs(),
            entries,
        }
    }

    /// Returns the cumulative counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
            fetches: self.counters.fetches.load(Ordering::Relaxed),
            fetch_failures: self.counters.fetch_failures.load(Ordering::Relaxed),
        }
    }

    async fn fetch(&self, key: &LocationKey) -> Result<Arc<CacheEntry>, PricingError> {
        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();

        let result =
            match tokio::time::timeout(self.config.fetch_timeout, self.feed.fetch(key)).await {
                Ok(Ok(record)) => PricingSnapshot::from_record(record)
                    .map_err(|e| PricingError::normalization(key.as_str(), e)),
                Ok(Err(error)) => Err(PricingError::from_feed(key.as_str(), &error)),
                Err(_) => Err(PricingError::from_feed(
                    key.as_str(),
                    &FeedError::timeout(format!(
                        "no answer within {} ms",
                        self.config.fetch_timeout.as_millis()
                    )),
                )),
            };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(snapshot) => {
                info!(
                    location = %key,
                    day_rates = snapshot.day_rates().len(),
                    skipped = snapshot.skipped_entries(),
                    elapsed_ms,
                    "pricing snapshot fetched"
                );
                Ok(Arc::new(CacheEntry::new(key.clone(), snapshot)))
            }
            Err(error) => {
                self.counters.fetch_failures.fetch_add(1, Ordering::Relaxed);
                warn!(location = %key, %error, elapsed_ms, "pricing fetch failed");
                Err(error)
            }
        }
    }
}
