//! # Domain Entities
//!
//! Configuration entities, pricing data and the request/result pair that
//! flows through quote generation.
//!
//! ## Configuration
//!
//! - [`ServiceArea`]: Cities and radius a vendor serves
//! - [`DispatcherLocation`]: A vendor's serving depot
//!
//! ## Pricing
//!
//! - [`PricingSnapshot`]: Normalized per-location pricing
//! - [`PricingFeedRecord`]: Feed output consumed by normalization
//!
//! ## Quoting
//!
//! - [`QuoteRequest`]: The move to be priced
//! - [`QuoteResult`]: A vendor's priced or rejected answer

pub mod dispatcher_location;
pub mod pricing_snapshot;
pub mod quote_request;
pub mod quote_result;
pub mod service_area;

pub use dispatcher_location::DispatcherLocation;
pub use pricing_snapshot::{
    CrewRate, CrewRateRecord, DateRestriction, PricingFeedRecord, PricingNotes, PricingSnapshot,
    RateResolution, RestrictedDateRecord, Restriction, RestrictionKind,
};
pub use quote_request::QuoteRequest;
pub use quote_result::{CostBreakdown, PricedQuote, QuoteOutcome, QuoteResult, RejectionReason};
pub use service_area::{ServiceArea, city_key, match_city};
