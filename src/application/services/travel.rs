//! # Travel Resolution
//!
//! Resolves the three route legs of a move for one dispatcher. The legs are
//! looked up concurrently. Pickup to dropoff is mandatory; a missing
//! dispatcher leg degrades the estimate to the single-leg approximation.

use crate::application::error::DispatchError;
use crate::domain::entities::{DispatcherLocation, QuoteRequest};
use crate::domain::value_objects::{RouteMetrics, TravelMetrics};
use crate::infrastructure::geo::{GeoResolver, GeoResult};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Route lookups for quote calculation.
#[derive(Debug, Clone)]
pub struct TravelResolver {
    geo: Arc<dyn GeoResolver>,
}

impl TravelResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(geo: Arc<dyn GeoResolver>) -> Self {
        Self { geo }
    }

    /// Pickup to dropoff only.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error when the route is unknown.
    pub async fn route(&self, request: &QuoteRequest) -> GeoResult<RouteMetrics> {
        self.route_between(&request.origin_address, &request.destination_address)
            .await
    }

    /// Route between two free-form addresses.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error when the route is unknown.
    pub async fn route_between(&self, origin: &str, destination: &str) -> GeoResult<RouteMetrics> {
        self.geo.route(origin, destination).await
    }

    /// Resolves every leg of the move as seen from `dispatcher`.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::RouteUnresolvable` when pickup to dropoff
    /// cannot be resolved.
    #[instrument(skip_all, fields(vendor = %dispatcher.vendor(), location = %dispatcher.id()))]
    pub async fn resolve(
        &self,
        dispatcher: &DispatcherLocation,
        request: &QuoteRequest,
    ) -> Result<TravelMetrics, DispatchError> {
        let (outbound, main, inbound) = tokio::join!(
            self.geo.route(dispatcher.address(), &request.origin_address),
            self.route(request),
            self.geo.route(&request.destination_address, dispatcher.address()),
        );

        let main = main
            .map_err(|e| DispatchError::route_unresolvable(dispatcher.vendor(), e.to_string()))?;
        match (outbound, inbound) {
            (Ok(outbound), Ok(inbound)) => Ok(TravelMetrics::full(outbound, main, inbound)),
            (outbound, inbound) => {
                debug!(
                    outbound_ok = outbound.is_ok(),
                    inbound_ok = inbound.is_ok(),
                    "dispatcher leg unavailable, using single-leg estimate"
                );
                Ok(TravelMetrics::one_leg(main))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{LocationId, VendorId};
    use crate::infrastructure::geo::InMemoryGeoResolver;
    use chrono::NaiveDate;

    fn fixtures() -> (InMemoryGeoResolver, DispatcherLocation, QuoteRequest) {
        let geo = InMemoryGeoResolver::new();
        let depot = DispatcherLocation::new(
            LocationId::new(10),
            VendorId::Northline,
            "Mississauga Depot",
            "2000 Argentia Rd, Mississauga, ON",
        );
        let request = QuoteRequest::new(
            "Toronto, ON",
            "Oakville, ON",
            NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
            2,
        );
        (geo, depot, request)
    }

    #[tokio::test]
    async fn resolves_three_legs() {
        let (geo, depot, request) = fixtures();
        let travel = TravelResolver::new(Arc::new(geo.clone()))
            .resolve(&depot, &request)
            .await
            .unwrap();
        assert!(travel.has_full_route());
        assert!(travel.one_way_km() > 20.0);
        assert_eq!(geo.route_calls(), 3);
    }

    #[tokio::test]
    async fn missing_dispatcher_leg_degrades() {
        let (geo, depot, request) = fixtures();
        geo.set_unresolvable("2000 Argentia Rd, Mississauga, ON");
        let travel = TravelResolver::new(Arc::new(geo))
            .resolve(&depot, &request)
            .await
            .unwrap();
        assert!(!travel.has_full_route());
    }

    #[tokio::test]
    async fn missing_main_leg_is_unresolvable() {
        let (geo, depot, request) = fixtures();
        geo.set_unresolvable("Oakville, ON");
        let err = TravelResolver::new(Arc::new(geo))
            .resolve(&depot, &request)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::RouteUnresolvable {
                vendor: VendorId::Northline,
                ..
            }
        ));
    }
}
