//! # Vendor Quote Engine
//!
//! One pricing strategy per vendor behind the [`VendorQuoteEngine`] trait.
//!
//! Every strategy receives the same [`QuoteContext`] (request, serving
//! dispatcher, resolved travel and the dispatcher's pricing snapshot) and
//! either prices the move or rejects it with a reason. Strategies are pure:
//! all I/O happens before they are called.
//!
//! | Vendor | Pricing | Ceilings |
//! |--------|---------|----------|
//! | Metro Movers | Dynamic feed + 10% markup | 10 h one way |
//! | Northline | Static card + fuel surcharge | 200 km route |
//! | Easy Haul | Static card, weight-based crew | 150 km route |
//! | Velocity | Static card + linehaul | 5000 km / 60 h |
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::services::quote_engine::QuoteEngineRegistry;
//! use move_quote::domain::value_objects::VendorId;
//!
//! let registry = QuoteEngineRegistry::standard();
//! let engine = registry.get(VendorId::Northline).unwrap();
//! assert_eq!(engine.vendor(), VendorId::Northline);
//! assert!(!engine.requires_pricing_snapshot());
//! ```

pub mod easy_haul;
pub mod metro_movers;
pub mod northline;
pub mod rules;
pub mod velocity;

pub use easy_haul::EasyHaulEngine;
pub use metro_movers::MetroMoversEngine;
pub use northline::NorthlineEngine;
pub use velocity::VelocityEngine;

use crate::domain::entities::{
    DispatcherLocation, PricingSnapshot, QuoteRequest, QuoteResult, RejectionReason,
};
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{TravelMetrics, VendorId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Context
// ============================================================================

/// Inputs to a single vendor calculation.
#[derive(Debug, Clone, Copy)]
pub struct QuoteContext<'a> {
    /// The move being priced.
    pub request: &'a QuoteRequest,
    /// The dispatcher serving the move.
    pub dispatcher: &'a DispatcherLocation,
    /// Resolved route legs.
    pub travel: &'a TravelMetrics,
    /// Pricing snapshot for the dispatcher, for dynamic-pricing vendors.
    pub snapshot: Option<&'a PricingSnapshot>,
}

impl<'a> QuoteContext<'a> {
    /// Creates a context without a pricing snapshot.
    #[must_use]
    pub fn new(
        request: &'a QuoteRequest,
        dispatcher: &'a DispatcherLocation,
        travel: &'a TravelMetrics,
    ) -> Self {
        Self {
            request,
            dispatcher,
            travel,
            snapshot: None,
        }
    }

    /// Attaches a pricing snapshot.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: &'a PricingSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Vendor owning the dispatcher.
    #[inline]
    #[must_use]
    pub fn vendor(&self) -> VendorId {
        self.dispatcher.vendor()
    }

    /// Builds a rejection for this context.
    #[must_use]
    pub fn reject(&self, reason: RejectionReason, message: impl Into<String>) -> QuoteResult {
        QuoteResult::rejected(
            self.request.id,
            self.vendor(),
            self.dispatcher.id(),
            self.dispatcher.name(),
            reason,
            message,
        )
    }
}

// ============================================================================
// Travel Limits
// ============================================================================

/// Distance and time ceilings a vendor will not exceed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TravelLimits {
    /// Maximum pickup-to-dropoff route distance in km.
    pub max_route_km: Option<f64>,
    /// Maximum one-way driving time in hours.
    pub max_one_way_hours: Option<f64>,
}

impl TravelLimits {
    /// No ceilings.
    pub const UNLIMITED: Self = Self {
        max_route_km: None,
        max_one_way_hours: None,
    };

    /// Checks the route, returning the violated ceiling if any.
    ///
    /// Distance is checked before time.
    #[must_use]
    pub fn violation(&self, travel: &TravelMetrics) -> Option<(RejectionReason, String)> {
        let km = travel.one_way_km();
        if let Some(max) = self.max_route_km
            && (km.is_nan() || km > max)
        {
            return Some((
                RejectionReason::DistanceLimitExceeded,
                format!("route of {km:.1} km exceeds the {max:.0} km limit"),
            ));
        }
        let hours = travel.one_way_hours();
        if let Some(max) = self.max_one_way_hours
            && (hours.is_nan() || hours > max)
        {
            return Some((
                RejectionReason::TravelTimeLimitExceeded,
                format!("one-way drive of {hours:.1} h exceeds the {max:.0} h limit"),
            ));
        }
        None
    }

    /// Returns true if the route respects every ceiling.
    #[must_use]
    pub fn permits(&self, travel: &TravelMetrics) -> bool {
        self.violation(travel).is_none()
    }
}

// ============================================================================
// Engine Trait
// ============================================================================

/// A vendor's pricing strategy.
pub trait VendorQuoteEngine: Send + Sync + fmt::Debug {
    /// Vendor this engine prices for.
    fn vendor(&self) -> VendorId;

    /// Distance and time ceilings.
    fn limits(&self) -> TravelLimits;

    /// Returns true if the engine needs a pricing snapshot.
    fn requires_pricing_snapshot(&self) -> bool {
        self.vendor().uses_dynamic_pricing()
    }

    /// Prices or rejects the move.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CalculationFault` when inputs cannot be priced
    /// (missing snapshot, non-finite route data).
    fn calculate(&self, ctx: &QuoteContext<'_>) -> DomainResult<QuoteResult>;
}

// ============================================================================
// Registry
// ============================================================================

/// Engines keyed by vendor.
#[derive(Debug, Clone, Default)]
pub struct QuoteEngineRegistry {
    engines: HashMap<VendorId, Arc<dyn VendorQuoteEngine>>,
}

impl QuoteEngineRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four production strategies.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_engine(Arc::new(MetroMoversEngine))
            .with_engine(Arc::new(NorthlineEngine))
            .with_engine(Arc::new(EasyHaulEngine))
            .with_engine(Arc::new(VelocityEngine))
    }

    /// Registers an engine, replacing any engine for the same vendor.
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn VendorQuoteEngine>) -> Self {
        self.engines.insert(engine.vendor(), engine);
        self
    }

    /// Engine for a vendor.
    #[must_use]
    pub fn get(&self, vendor: VendorId) -> Option<Arc<dyn VendorQuoteEngine>> {
        self.engines.get(&vendor).cloned()
    }

    /// Registered vendors in stable order.
    #[must_use]
    pub fn vendors(&self) -> Vec<VendorId> {
        let mut vendors: Vec<VendorId> = self.engines.keys().copied().collect();
        vendors.sort();
        vendors
    }

    /// Number of registered engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Returns true if no engine is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
