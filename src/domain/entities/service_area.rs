//! # Service Area Entity
//!
//! The cities a vendor serves and how far from a dispatcher it will travel
//! to reach a pickup.
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::entities::service_area::ServiceArea;
//! use move_quote::domain::value_objects::VendorId;
//!
//! let area = ServiceArea::new(
//!     VendorId::Northline,
//!     "Mississauga",
//!     ["Toronto", "Mississauga", "Oakville"],
//!     100.0,
//! )
//! .unwrap();
//!
//! assert!(area.accepts("OAKVILLE"));
//! assert!(!area.accepts("Ottawa"));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::VendorId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Normalizes a city name for comparison.
#[must_use]
pub fn city_key(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Finds the canonical city named in an address.
///
/// Matching is a case-insensitive substring search; the longest contained
/// city wins and equal lengths fall back to alphabetical order, so "North
/// York" beats "York" and the result is stable.
#[must_use]
pub fn match_city<'a, I>(address: &str, cities: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let haystack = address.to_lowercase();
    cities
        .into_iter()
        .filter(|city| {
            let key = city_key(city);
            !key.is_empty() && haystack.contains(&key)
        })
        .min_by(|a, b| {
            b.trim()
                .len()
                .cmp(&a.trim().len())
                .then_with(|| city_key(a).cmp(&city_key(b)))
        })
}

/// Per-vendor service area.
///
/// # Invariants
///
/// - At least one city is served
/// - The primary city is one of the served cities
/// - `max_radius_km` is finite and positive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceArea {
    vendor: VendorId,
    primary_city: String,
    cities: Vec<String>,
    #[serde(skip)]
    city_keys: BTreeSet<String>,
    max_radius_km: f64,
}

impl ServiceArea {
    /// Creates a validated service area.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidServiceArea` if the city list is empty,
    /// the primary city is not served, or the radius is not positive.
    pub fn new<I, S>(
        vendor: VendorId,
        primary_city: impl Into<String>,
        cities: I,
        max_radius_km: f64,
    ) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let primary_city = primary_city.into().trim().to_string();
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for city in cities {
            let city: String = city.into().trim().to_string();
            if !city.is_empty() && seen.insert(city_key(&city)) {
                ordered.push(city);
            }
        }

        if ordered.is_empty() {
            return Err(DomainError::invalid_service_area(format!(
                "{vendor}: no cities configured"
            )));
        }
        if !seen.contains(&city_key(&primary_city)) {
            return Err(DomainError::invalid_service_area(format!(
                "{vendor}: primary city '{primary_city}' is not served"
            )));
        }
        if !max_radius_km.is_finite() || max_radius_km <= 0.0 {
            return Err(DomainError::invalid_service_area(format!(
                "{vendor}: max radius must be positive, got {max_radius_km}"
            )));
        }

        Ok(Self {
            vendor,
            primary_city,
            cities: ordered,
            city_keys: seen,
            max_radius_km,
        })
    }

    /// Vendor owning the area.
    #[inline]
    #[must_use]
    pub fn vendor(&self) -> VendorId {
        self.vendor
    }

    /// City assumed when an address matches no known city.
    #[inline]
    #[must_use]
    pub fn primary_city(&self) -> &str {
        &self.primary_city
    }

    /// Served cities in configuration order.
    #[inline]
    #[must_use]
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Maximum dispatcher-to-pickup distance in km.
    #[inline]
    #[must_use]
    pub fn max_radius_km(&self) -> f64 {
        self.max_radius_km
    }

    /// Returns true if the city is served (case-insensitive).
    #[must_use]
    pub fn accepts(&self, city: &str) -> bool {
        self.city_keys.contains(&city_key(city))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn area() -> ServiceArea {
        ServiceArea::new(
            VendorId::EasyHaul,
            "Toronto",
            ["Toronto", " Markham ", "toronto", ""],
            60.0,
        )
        .unwrap()
    }

    #[test]
    fn deduplicates_and_trims_cities() {
        let area = area();
        assert_eq!(area.cities(), &["Toronto".to_string(), "Markham".to_string()]);
        assert_eq!(area.primary_city(), "Toronto");
        assert_eq!(area.vendor(), VendorId::EasyHaul);
    }

    #[test]
    fn accepts_is_case_insensitive() {
        let area = area();
        assert!(area.accepts("markham"));
        assert!(area.accepts("  TORONTO "));
        assert!(!area.accepts("Ajax"));
    }

    #[test]
    fn rejects_unserved_primary_city() {
        let result = ServiceArea::new(VendorId::Northline, "Ottawa", ["Toronto"], 50.0);
        assert!(matches!(result, Err(DomainError::InvalidServiceArea(_))));
    }

    #[test]
    fn rejects_empty_city_list() {
        let result = ServiceArea::new(VendorId::Northline, "Toronto", Vec::<String>::new(), 50.0);
        assert!(result.is_err());
    }

    #[test]
    fn match_city_prefers_longest_then_alphabetical() {
        let cities = ["York", "North York", "Toronto", "Ajax"];
        assert_eq!(
            match_city("5100 Yonge St, North York, ON", cities),
            Some("North York")
        );
        assert_eq!(match_city("1 Main St, TORONTO", cities), Some("Toronto"));
        assert_eq!(match_city("Ajax or York", ["York", "Ajax"]), Some("Ajax"));
        assert_eq!(match_city("Calgary, AB", cities), None);
        assert_eq!(match_city("anything", [""]), None);
    }

    #[test]
    fn rejects_non_positive_radius() {
        assert!(ServiceArea::new(VendorId::Velocity, "Toronto", ["Toronto"], 0.0).is_err());
        assert!(ServiceArea::new(VendorId::Velocity, "Toronto", ["Toronto"], f64::NAN).is_err());
    }
}
