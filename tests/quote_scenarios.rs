//! # Quote Scenarios
//!
//! End-to-end quote runs through the orchestrator with in-memory adapters:
//! a local move, a cross-country move, a pricing refresh that drops every
//! day rate, and a burst of concurrent requests on a cold cache.

#![allow(clippy::unwrap_used)]

mod common;

use common::{
    Harness, cross_country_request, harness, harness_with, local_request, move_date,
    pricing_record, pricing_record_with_day_rate,
};
use move_quote::application::services::PricingCacheConfig;
use move_quote::domain::entities::{RateResolution, RejectionReason};
use move_quote::domain::value_objects::{HeavyItem, LocationKey, VendorId};
use move_quote::infrastructure::geo::InMemoryGeoResolver;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

fn metro_hourly_rate(batch: &move_quote::application::QuoteBatch) -> Decimal {
    batch
        .quotes
        .iter()
        .find(|q| q.vendor() == VendorId::MetroMovers)
        .and_then(|q| q.priced())
        .map(|p| p.hourly_rate)
        .unwrap()
}

// ============================================================================
// Local Move
// ============================================================================

#[tokio::test]
async fn local_three_room_move_is_priced_by_every_vendor() {
    let Harness {
        orchestrator, feed, ..
    } = harness().await;

    let batch = orchestrator.generate(&local_request(3)).await.unwrap();

    assert!(!batch.timed_out);
    assert!(batch.vendors_failed.is_empty(), "{:?}", batch.vendors_failed);
    assert!((3..=4).contains(&batch.priced().count()));
    for quote in batch.priced() {
        let cost = quote.total_cost().unwrap();
        assert!(
            cost > Decimal::new(500, 0) && cost < Decimal::new(2_000, 0),
            "{quote}"
        );
        assert!(matches!(quote.crew_size(), Some(2 | 3)), "{quote}");
    }
    assert_eq!(feed.fetch_count(&LocationKey::new("Toronto")), 1);
}

#[tokio::test]
async fn quotes_are_ordered_by_vendor() {
    let Harness { orchestrator, .. } = harness().await;

    let batch = orchestrator.generate(&local_request(2)).await.unwrap();
    let vendors: Vec<_> = batch.quotes.iter().map(|q| q.vendor()).collect();

    let mut sorted = vendors.clone();
    sorted.sort();
    assert_eq!(vendors, sorted);
    assert!(batch.quotes.iter().all(|q| q.request_id() == batch.request_id));
}

#[tokio::test]
async fn pickup_is_geocoded_once_per_request() {
    let geo = InMemoryGeoResolver::new();
    let Harness { orchestrator, .. } = harness_with(
        Arc::new(geo.clone()),
        PricingCacheConfig::default(),
        Duration::from_secs(30),
    )
    .await;

    let batch = orchestrator.generate(&local_request(3)).await.unwrap();
    assert!(batch.priced().count() >= 3);
    assert_eq!(geo.geocode_calls(), 1);

    orchestrator.generate(&local_request(3)).await.unwrap();
    assert_eq!(geo.geocode_calls(), 2);
}

// ============================================================================
// Cross-Country Move
// ============================================================================

#[tokio::test]
async fn cross_country_move_with_piano() {
    let Harness {
        orchestrator, feed, ..
    } = harness().await;
    let request = cross_country_request(4).with_heavy_item(HeavyItem::Piano, 1);

    let batch = orchestrator.generate(&request).await.unwrap();

    let velocity = batch
        .quotes
        .iter()
        .find(|q| q.vendor() == VendorId::Velocity)
        .unwrap();
    assert!(velocity.is_quoted());
    assert!(velocity.crew_size().unwrap() >= 3);
    assert!(velocity.total_cost().unwrap() > Decimal::new(1_000, 0));

    for quote in batch.quotes.iter().filter(|q| q.vendor() != VendorId::Velocity) {
        let reason = quote.rejection_reason().unwrap();
        assert!(reason.is_limit_exceeded(), "{quote}");
    }
    let metro = batch
        .quotes
        .iter()
        .find(|q| q.vendor() == VendorId::MetroMovers)
        .unwrap();
    assert_eq!(
        metro.rejection_reason(),
        Some(RejectionReason::TravelTimeLimitExceeded)
    );
    // Ceiling rejections never touch the feed.
    assert_eq!(feed.total_fetches(), 0);
}

// ============================================================================
// Expired Pricing Without Day Rates
// ============================================================================

#[tokio::test(start_paused = true)]
async fn expired_snapshot_without_day_rates_falls_back() {
    let Harness {
        orchestrator,
        feed,
        cache,
    } = harness_with(
        Arc::new(InMemoryGeoResolver::new()),
        PricingCacheConfig::with_ttl(Duration::from_secs(60)),
        Duration::from_secs(30),
    )
    .await;
    let toronto = LocationKey::new("Toronto");
    feed.publish(
        "Toronto",
        pricing_record_with_day_rate("Toronto", "09-12", Decimal::new(190, 0)),
    );

    let first = orchestrator.generate(&local_request(3)).await.unwrap();
    // Crew-table rate plus the day premium over the fallback.
    assert_eq!(metro_hourly_rate(&first), Decimal::new(235, 0));

    feed.publish("Toronto", pricing_record("Toronto"));
    tokio::time::advance(Duration::from_secs(61)).await;

    let second = orchestrator.generate(&local_request(3)).await.unwrap();
    assert_eq!(feed.fetch_count(&toronto), 2);
    assert_eq!(metro_hourly_rate(&second), Decimal::new(205, 0));

    let entry = cache.peek(&toronto).unwrap();
    assert!(entry.snapshot().day_rates().is_empty());
    assert_eq!(
        entry.snapshot().resolve_base_rate(move_date()),
        RateResolution::Fallback(Decimal::new(160, 0))
    );
}

// ============================================================================
// Concurrent Requests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn concurrent_requests_share_one_pricing_fetch() {
    let Harness {
        orchestrator, feed, ..
    } = harness().await;
    feed.set_delay(Some(Duration::from_millis(250)));

    let batches = futures::future::join_all(
        (0..50).map(|_| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.generate(&local_request(3)).await })
        }),
    )
    .await;

    for batch in batches {
        let batch = batch.unwrap().unwrap();
        assert!(batch.vendors_failed.is_empty());
        assert!(
            batch
                .quotes
                .iter()
                .any(|q| q.vendor() == VendorId::MetroMovers && q.is_quoted())
        );
    }
    assert_eq!(feed.fetch_count(&LocationKey::new("Toronto")), 1);
    assert_eq!(feed.total_fetches(), 1);
}
