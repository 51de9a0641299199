//! # Dispatcher Location Entity
//!
//! A vendor's physical depot. Travel is measured from here, and the
//! location's pricing key selects the pricing snapshot for dynamically
//! priced vendors.
//!
//! Locations are configuration data: they are deactivated, never deleted.
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::entities::dispatcher_location::DispatcherLocation;
//! use move_quote::domain::value_objects::{GeoPoint, LocationId, VendorId};
//!
//! let depot = DispatcherLocation::new(
//!     LocationId::new(1),
//!     VendorId::MetroMovers,
//!     "Toronto",
//!     "100 Front St W, Toronto, ON",
//! )
//! .with_coordinate(GeoPoint::new(43.6453, -79.3806).unwrap());
//!
//! assert!(depot.is_active());
//! assert_eq!(depot.pricing_key().as_str(), "Toronto");
//! assert!(depot.covers_city("Anywhere"));
//! ```

use crate::domain::entities::service_area::city_key;
use crate::domain::value_objects::{GeoPoint, LocationId, LocationKey, VendorId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate serving location for one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatcherLocation {
    id: LocationId,
    vendor: VendorId,
    name: String,
    address: String,
    coordinate: Option<GeoPoint>,
    active: bool,
    served_cities: Vec<String>,
    pricing_key: LocationKey,
}

impl DispatcherLocation {
    /// Creates an active location without coordinates.
    ///
    /// The pricing key defaults to the display name.
    #[must_use]
    pub fn new(
        id: LocationId,
        vendor: VendorId,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let pricing_key = LocationKey::new(&name);
        Self {
            id,
            vendor,
            name,
            address: address.into(),
            coordinate: None,
            active: true,
            served_cities: Vec::new(),
            pricing_key,
        }
    }

    /// Sets the geocoordinate.
    #[must_use]
    pub fn with_coordinate(mut self, coordinate: GeoPoint) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    /// Restricts the location to a subset of the vendor's cities.
    #[must_use]
    pub fn with_served_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.served_cities = cities.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the pricing key.
    #[must_use]
    pub fn with_pricing_key(mut self, key: LocationKey) -> Self {
        self.pricing_key = key;
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Marks the location inactive.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Location identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> LocationId {
        self.id
    }

    /// Owning vendor.
    #[inline]
    #[must_use]
    pub fn vendor(&self) -> VendorId {
        self.vendor
    }

    /// Display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Street address.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Geocoordinate, if configured.
    #[inline]
    #[must_use]
    pub fn coordinate(&self) -> Option<GeoPoint> {
        self.coordinate
    }

    /// Whether the location currently takes jobs.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Key under which the location's pricing is published.
    #[inline]
    #[must_use]
    pub fn pricing_key(&self) -> &LocationKey {
        &self.pricing_key
    }

    /// Cities this location is restricted to; empty means all vendor cities.
    #[inline]
    #[must_use]
    pub fn served_cities(&self) -> &[String] {
        &self.served_cities
    }

    /// Returns true if the location's own coverage admits the city.
    #[must_use]
    pub fn covers_city(&self, city: &str) -> bool {
        let wanted = city_key(city);
        self.served_cities.is_empty() || self.served_cities.iter().any(|c| city_key(c) == wanted)
    }
}

impl fmt::Display for DispatcherLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.vendor, self.name, self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn depot() -> DispatcherLocation {
        DispatcherLocation::new(
            LocationId::new(7),
            VendorId::Velocity,
            "Ottawa Depot",
            "1 Rideau St, Ottawa, ON",
        )
    }

    #[test]
    fn defaults() {
        let depot = depot();
        assert!(depot.is_active());
        assert!(depot.coordinate().is_none());
        assert_eq!(depot.pricing_key(), &LocationKey::new("Ottawa Depot"));
        assert_eq!(depot.to_string(), "velocity Ottawa Depot (loc-7)");
    }

    #[test]
    fn served_city_restriction() {
        let depot = depot().with_served_cities(["Ottawa", "Gatineau"]);
        assert!(depot.covers_city("ottawa"));
        assert!(!depot.covers_city("Montreal"));
    }

    #[test]
    fn deactivate_keeps_record() {
        let mut depot = depot();
        depot.deactivate();
        assert!(!depot.is_active());
        assert_eq!(depot.id(), LocationId::new(7));
    }

    #[test]
    fn pricing_key_override() {
        let depot = depot().with_pricing_key(LocationKey::new("Ottawa"));
        assert_eq!(depot.pricing_key().as_str(), "Ottawa");
    }
}
