//! # Travel Metrics
//!
//! Route legs of a move as seen from the serving dispatcher.
//!
//! A full estimate is the round trip dispatcher → origin → destination →
//! dispatcher. When only the origin → destination leg is known the trip is
//! approximated by scaling that leg with a vendor-specific factor.

use crate::domain::value_objects::geo::RouteMetrics;
use serde::{Deserialize, Serialize};

/// Resolved route legs for one vendor and one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelMetrics {
    /// Dispatcher to pickup, when resolvable.
    pub dispatcher_to_origin: Option<RouteMetrics>,
    /// Pickup to dropoff. Always known.
    pub origin_to_destination: RouteMetrics,
    /// Dropoff back to the dispatcher, when resolvable.
    pub destination_to_dispatcher: Option<RouteMetrics>,
}

impl TravelMetrics {
    /// Metrics with all three legs known.
    #[must_use]
    pub fn full(
        dispatcher_to_origin: RouteMetrics,
        origin_to_destination: RouteMetrics,
        destination_to_dispatcher: RouteMetrics,
    ) -> Self {
        Self {
            dispatcher_to_origin: Some(dispatcher_to_origin),
            origin_to_destination,
            destination_to_dispatcher: Some(destination_to_dispatcher),
        }
    }

    /// Metrics with only the origin → destination leg known.
    #[must_use]
    pub fn one_leg(origin_to_destination: RouteMetrics) -> Self {
        Self {
            dispatcher_to_origin: None,
            origin_to_destination,
            destination_to_dispatcher: None,
        }
    }

    /// Returns true when both dispatcher legs are known.
    #[inline]
    #[must_use]
    pub fn has_full_route(&self) -> bool {
        self.dispatcher_to_origin.is_some() && self.destination_to_dispatcher.is_some()
    }

    /// One-way driving distance between pickup and dropoff, in km.
    #[inline]
    #[must_use]
    pub fn one_way_km(&self) -> f64 {
        self.origin_to_destination.distance_km()
    }

    /// One-way driving time between pickup and dropoff, in hours.
    #[inline]
    #[must_use]
    pub fn one_way_hours(&self) -> f64 {
        self.origin_to_destination.duration_hours()
    }

    /// Total passenger-vehicle driving hours for the trip.
    ///
    /// Uses the three legs when available, otherwise the single leg times
    /// `one_leg_factor`.
    #[must_use]
    pub fn trip_hours(&self, one_leg_factor: f64) -> f64 {
        match (self.dispatcher_to_origin, self.destination_to_dispatcher) {
            (Some(outbound), Some(inbound)) => {
                outbound.duration_hours() + self.one_way_hours() + inbound.duration_hours()
            }
            _ => self.one_way_hours() * one_leg_factor,
        }
    }

    /// Total driving distance for the trip, in km, following the same
    /// degradation rule as [`trip_hours`](Self::trip_hours).
    #[must_use]
    pub fn trip_km(&self, one_leg_factor: f64) -> f64 {
        match (self.dispatcher_to_origin, self.destination_to_dispatcher) {
            (Some(outbound), Some(inbound)) => {
                outbound.distance_km() + self.one_way_km() + inbound.distance_km()
            }
            _ => self.one_way_km() * one_leg_factor,
        }
    }
}
