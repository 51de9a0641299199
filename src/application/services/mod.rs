//! # Application Services
//!
//! - [`PricingCache`]: TTL cache of per-location pricing snapshots
//! - [`PricingRefreshDaemon`]: periodic cache refresh
//! - [`GeographicDispatchSelector`]: nearest serving dispatcher per vendor
//! - [`TravelResolver`]: route legs for a dispatcher
//! - [`QuoteOrchestrator`]: concurrent multi-vendor quoting

pub mod dispatch_selector;
pub mod pricing_cache;
pub mod pricing_refresh;
pub mod quote_orchestrator;
pub mod travel;

pub use dispatch_selector::{CityMatch, DispatchSelection, GeographicDispatchSelector, Pickup};
pub use pricing_cache::{
    CacheEntry, CacheStats, CacheStatus, EntryStatus, PricingCache, PricingCacheConfig,
    RefreshFailure, RefreshReport,
};
pub use pricing_refresh::PricingRefreshDaemon;
pub use quote_orchestrator::{
    LocationRefresh, OrchestratorConfig, QuoteBatch, QuoteOrchestrator, RefreshOutcome,
    VendorFailure, VendorInfo,
};
pub use travel::TravelResolver;
