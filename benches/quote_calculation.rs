//! # Quote Calculation Benchmarks
//!
//! Per-vendor cost of a single `calculate` call with travel and pricing
//! already resolved, plus pricing-record normalization.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use move_quote::domain::entities::{
    CrewRateRecord, DispatcherLocation, PricingFeedRecord, PricingSnapshot, QuoteRequest,
};
use move_quote::domain::services::{QuoteContext, QuoteEngineRegistry};
use move_quote::domain::value_objects::{
    AdditionalService, HeavyItem, LocationId, RouteMetrics, TravelMetrics, VendorId,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::hint::black_box;

fn request() -> QuoteRequest {
    QuoteRequest::new(
        "100 Queen St W, Toronto, ON",
        "300 City Centre Dr, Mississauga, ON",
        NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
        4,
    )
    .with_heavy_item(HeavyItem::Piano, 1)
    .with_stairs(2, 0)
    .with_service(AdditionalService::Packing)
}

fn record() -> PricingFeedRecord {
    let day_rates = (1..=28)
        .flat_map(|day| (1..=12).map(move |month| (format!("{month:02}-{day:02}"), day)))
        .map(|(key, day)| (key, Decimal::new(150 + i64::from(day), 0)))
        .collect::<BTreeMap<_, _>>();
    PricingFeedRecord {
        location_name: "Toronto".to_string(),
        day_rates,
        default_rate: Some(Decimal::new(160, 0)),
        crew_rate_table: (2..=6)
            .map(|crew| CrewRateRecord {
                crew_size: crew,
                trucks: None,
                rate: Decimal::new(110 + 45 * i64::from(crew), 0),
            })
            .collect(),
        ..PricingFeedRecord::default()
    }
}

fn travel() -> TravelMetrics {
    TravelMetrics::full(
        RouteMetrics::new(3_000.0, 600.0),
        RouteMetrics::new(28_000.0, 1_800.0),
        RouteMetrics::new(26_000.0, 1_700.0),
    )
}

fn bench_engines(c: &mut Criterion) {
    let registry = QuoteEngineRegistry::standard();
    let request = request();
    let travel = travel();
    let snapshot = PricingSnapshot::from_record(record()).expect("valid record");

    let mut group = c.benchmark_group("quote_calculation");
    for vendor in VendorId::ALL {
        let engine = registry.get(vendor).expect("standard engine");
        let dispatcher =
            DispatcherLocation::new(LocationId::new(1), vendor, "Toronto", "1 Yonge St, Toronto, ON");
        let ctx = QuoteContext::new(&request, &dispatcher, &travel).with_snapshot(&snapshot);

        group.bench_with_input(BenchmarkId::from_parameter(vendor), &ctx, |b, ctx| {
            b.iter(|| engine.calculate(black_box(ctx)));
        });
    }
    group.finish();
}

fn bench_normalization(c: &mut Criterion) {
    let record = record();
    c.bench_function("pricing_snapshot_from_record", |b| {
        b.iter(|| PricingSnapshot::from_record(black_box(record.clone())));
    });
}

criterion_group!(benches, bench_engines, bench_normalization);
criterion_main!(benches);
