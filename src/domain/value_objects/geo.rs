//! # Geographic Value Objects
//!
//! Coordinates, great-circle distance and driving-route metrics.
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::value_objects::geo::GeoPoint;
//!
//! let toronto = GeoPoint::new(43.6532, -79.3832).unwrap();
//! let mississauga = GeoPoint::new(43.5890, -79.6441).unwrap();
//!
//! let km = toronto.distance_km(&mississauga);
//! assert!(km > 20.0 && km < 25.0);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A latitude/longitude pair in decimal degrees.
///
/// # Invariants
///
/// - Latitude in `[-90, 90]`, longitude in `[-180, 180]`, both finite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Creates a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` when either component is out
    /// of range or not finite.
    pub fn new(lat: f64, lng: f64) -> DomainResult<Self> {
        if !lat.is_finite() || !lng.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::invalid_coordinate(lat, lng));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::invalid_coordinate(lat, lng));
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    #[inline]
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[inline]
    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to another point in kilometres (haversine).
    #[must_use]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Driving distance and duration between two addresses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Driving distance in metres.
    pub distance_meters: f64,
    /// Driving duration in seconds.
    pub duration_seconds: f64,
}

impl RouteMetrics {
    /// Creates route metrics, clamping negative inputs to zero.
    #[must_use]
    pub fn new(distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            distance_meters: distance_meters.max(0.0),
            duration_seconds: duration_seconds.max(0.0),
        }
    }

    /// Distance in kilometres.
    #[inline]
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1_000.0
    }

    /// Duration in hours.
    #[inline]
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        self.duration_seconds / 3_600.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(1.0, 0.0).unwrap();
        assert!((a.distance_km(&b) - 111.19).abs() < 0.1);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let toronto = GeoPoint::new(43.6532, -79.3832).unwrap();
        let vancouver = GeoPoint::new(49.2827, -123.1207).unwrap();
        assert!(toronto.distance_km(&toronto).abs() < 1e-9);
        let there = toronto.distance_km(&vancouver);
        let back = vancouver.distance_km(&toronto);
        assert!((there - back).abs() < 1e-6);
        assert!(there > 3_300.0 && there < 3_400.0);
    }

    #[test]
    fn route_metrics_units() {
        let route = RouteMetrics::new(25_500.0, 1_800.0);
        assert!((route.distance_km() - 25.5).abs() < f64::EPSILON);
        assert!((route.duration_hours() - 0.5).abs() < f64::EPSILON);

        let clamped = RouteMetrics::new(-1.0, -5.0);
        assert_eq!(clamped.distance_meters, 0.0);
        assert_eq!(clamped.duration_seconds, 0.0);
    }
}
