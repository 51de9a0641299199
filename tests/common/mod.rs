//! # Shared Fixtures
//!
//! Builders shared by the integration tests: the built-in dispatcher
//! directory, an in-memory geo resolver, and a pricing feed seeded with the
//! three dynamic-pricing locations.

#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::NaiveDate;
use move_quote::application::services::{
    OrchestratorConfig, PricingCache, PricingCacheConfig, QuoteOrchestrator,
};
use move_quote::domain::entities::{CrewRateRecord, PricingFeedRecord, QuoteRequest};
use move_quote::domain::services::QuoteEngineRegistry;
use move_quote::domain::value_objects::{GeoPoint, LocationKey, RouteMetrics};
use move_quote::infrastructure::geo::{GeoResolver, GeoResult, InMemoryGeoResolver};
use move_quote::infrastructure::persistence::InMemoryDispatcherDirectory;
use move_quote::infrastructure::pricing_feed::{InMemoryPricingFeed, PricingFeed};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Locations published by the test feed.
pub const PRICING_LOCATIONS: [&str; 3] = ["Toronto", "Mississauga", "Markham"];

// ============================================================================
// Requests
// ============================================================================

/// Friday in peak season.
pub fn move_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 12).unwrap()
}

/// Downtown Toronto to Mississauga.
pub fn local_request(rooms: u32) -> QuoteRequest {
    QuoteRequest::new(
        "100 Queen St W, Toronto, ON",
        "300 City Centre Dr, Mississauga, ON",
        move_date(),
        rooms,
    )
}

/// Downtown Toronto to downtown Vancouver.
pub fn cross_country_request(rooms: u32) -> QuoteRequest {
    QuoteRequest::new(
        "100 Queen St W, Toronto, ON",
        "1 Robson St, Vancouver, BC",
        move_date(),
        rooms,
    )
}

// ============================================================================
// Pricing Records
// ============================================================================

/// Record with a crew table and an explicit fallback rate, but no day rates.
pub fn pricing_record(name: &str) -> PricingFeedRecord {
    PricingFeedRecord {
        location_name: name.to_string(),
        default_rate: Some(Decimal::new(160, 0)),
        crew_rate_table: vec![
            CrewRateRecord {
                crew_size: 2,
                trucks: None,
                rate: Decimal::new(160, 0),
            },
            CrewRateRecord {
                crew_size: 3,
                trucks: None,
                rate: Decimal::new(205, 0),
            },
            CrewRateRecord {
                crew_size: 4,
                trucks: None,
                rate: Decimal::new(250, 0),
            },
        ],
        ..PricingFeedRecord::default()
    }
}

/// [`pricing_record`] with one published day rate.
pub fn pricing_record_with_day_rate(name: &str, day: &str, rate: Decimal) -> PricingFeedRecord {
    PricingFeedRecord {
        day_rates: BTreeMap::from([(day.to_string(), rate)]),
        ..pricing_record(name)
    }
}

/// Feed publishing every entry of [`PRICING_LOCATIONS`].
pub fn seeded_feed() -> Arc<InMemoryPricingFeed> {
    let feed = InMemoryPricingFeed::new();
    for name in PRICING_LOCATIONS {
        feed.publish(name, pricing_record(name));
    }
    Arc::new(feed)
}

/// Cache over `feed` with every test location registered.
pub fn cache_over(feed: &Arc<InMemoryPricingFeed>, config: PricingCacheConfig) -> Arc<PricingCache> {
    let cache = Arc::new(PricingCache::new(
        Arc::clone(feed) as Arc<dyn PricingFeed>,
        config,
    ));
    cache.register(PRICING_LOCATIONS.map(LocationKey::new));
    cache
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Everything a scenario needs to drive and observe a quote run.
pub struct Harness {
    pub orchestrator: QuoteOrchestrator,
    pub feed: Arc<InMemoryPricingFeed>,
    pub cache: Arc<PricingCache>,
}

/// Standard engines over in-memory adapters.
pub async fn harness() -> Harness {
    harness_with(
        Arc::new(InMemoryGeoResolver::new()),
        PricingCacheConfig::default(),
        Duration::from_secs(30),
    )
    .await
}

/// Standard engines over a caller-supplied geo resolver and cache config.
pub async fn harness_with(
    geo: Arc<dyn GeoResolver>,
    cache_config: PricingCacheConfig,
    deadline: Duration,
) -> Harness {
    let feed = seeded_feed();
    let cache = cache_over(&feed, cache_config);
    let orchestrator = QuoteOrchestrator::new(
        Arc::new(InMemoryDispatcherDirectory::builtin().unwrap()),
        geo,
        Arc::clone(&cache),
        QuoteEngineRegistry::standard(),
        OrchestratorConfig::with_deadline(deadline),
    );
    orchestrator.register_pricing_locations().await.unwrap();
    Harness {
        orchestrator,
        feed,
        cache,
    }
}

// ============================================================================
// Geo Doubles
// ============================================================================

/// Resolver that never answers for addresses containing `marker`.
///
/// Every other query goes to the wrapped [`InMemoryGeoResolver`].
#[derive(Debug, Clone)]
pub struct HangingGeoResolver {
    inner: InMemoryGeoResolver,
    marker: String,
}

impl HangingGeoResolver {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            inner: InMemoryGeoResolver::new(),
            marker: marker.into(),
        }
    }

    fn hangs(&self, address: &str) -> bool {
        address.contains(&self.marker)
    }
}

#[async_trait]
impl GeoResolver for HangingGeoResolver {
    async fn geocode(&self, address: &str) -> GeoResult<GeoPoint> {
        if self.hangs(address) {
            std::future::pending::<()>().await;
        }
        self.inner.geocode(address).await
    }

    async fn route(&self, from: &str, to: &str) -> GeoResult<RouteMetrics> {
        if self.hangs(from) || self.hangs(to) {
            std::future::pending::<()>().await;
        }
        self.inner.route(from, to).await
    }
}
