//! # Geographic Dispatch Selector
//!
//! Picks the dispatcher that serves a pickup address for one vendor.
//!
//! 1. Resolve the address to a canonical city: the longest known city name
//!    contained in it, else the vendor's primary city.
//! 2. Keep the vendor's active locations whose service area and own coverage
//!    accept that city.
//! 3. Measure each candidate's great-circle distance to the geocoded pickup.
//!    A candidate whose coordinate cannot be resolved is skipped.
//! 4. Take the nearest (lowest id on ties); reject it if it lies beyond the
//!    vendor's radius.
//!
//! A [`Pickup`] carries the per-request lookups every vendor needs (the
//! known-city list and the pickup coordinate) so that selecting for several
//! vendors geocodes the address once.

use crate::application::error::DispatchError;
use crate::domain::entities::{DispatcherLocation, ServiceArea, match_city};
use crate::domain::value_objects::{GeoPoint, VendorId};
use crate::infrastructure::geo::GeoResolver;
use crate::infrastructure::persistence::DispatcherDirectory;
use futures::future::join_all;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

/// A pickup address shared across the vendor selections of one request.
///
/// Lookups run on first use and are reused afterwards, including a failed
/// geocode. A directory failure while listing cities is not kept.
#[derive(Debug)]
pub struct Pickup {
    address: String,
    known_cities: OnceCell<Vec<String>>,
    point: OnceCell<Result<GeoPoint, String>>,
}

impl Pickup {
    /// Creates a pickup with nothing resolved yet.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            known_cities: OnceCell::new(),
            point: OnceCell::new(),
        }
    }

    /// Returns the address.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// How the pickup city was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CityMatch {
    /// The address names a known city.
    Matched,
    /// No known city matched; the vendor's primary city was assumed.
    PrimaryCityFallback,
}

/// A selected dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchSelection {
    /// The serving location.
    pub location: DispatcherLocation,
    /// Great-circle distance from the location to the pickup, in km.
    pub distance_km: f64,
    /// City the pickup was resolved to.
    pub city: String,
    /// How `city` was determined.
    pub city_match: CityMatch,
}

/// Nearest-dispatcher selection over the directory and a geo resolver.
#[derive(Debug, Clone)]
pub struct GeographicDispatchSelector {
    directory: Arc<dyn DispatcherDirectory>,
    geo: Arc<dyn GeoResolver>,
}

impl GeographicDispatchSelector {
    /// Creates a selector.
    #[must_use]
    pub fn new(directory: Arc<dyn DispatcherDirectory>, geo: Arc<dyn GeoResolver>) -> Self {
        Self { directory, geo }
    }

    /// Selects the serving dispatcher for a pickup address.
    ///
    /// # Errors
    ///
    /// - `DispatchError::NotServed` when the vendor has no area, the city is
    ///   outside it, no active location covers the city, or the nearest one
    ///   is beyond the vendor's radius
    /// - `DispatchError::RouteUnresolvable` when no candidate distance could
    ///   be measured
    /// - `DispatchError::Directory` when the directory fails
    pub async fn select(
        &self,
        vendor: VendorId,
        origin_address: &str,
    ) -> Result<DispatchSelection, DispatchError> {
        self.select_for(vendor, &Pickup::new(origin_address)).await
    }

    /// Like [`select`](Self::select), reusing whatever `pickup` has already
    /// resolved.
    ///
    /// # Errors
    ///
    /// As for [`select`](Self::select).
    #[instrument(skip_all, fields(vendor = %vendor, pickup = pickup.address()))]
    pub async fn select_for(
        &self,
        vendor: VendorId,
        pickup: &Pickup,
    ) -> Result<DispatchSelection, DispatchError> {
        let area = match self.directory.service_area(vendor).await {
            Ok(area) => area,
            Err(e) if e.is_not_found() => {
                return Err(DispatchError::not_served(vendor, "no service area"));
            }
            Err(e) => return Err(e.into()),
        };

        let known_cities = pickup
            .known_cities
            .get_or_try_init(|| self.directory.known_cities())
            .await?;
        let (city, city_match) = resolve_city(pickup.address(), known_cities, &area);
        if !area.accepts(&city) {
            return Err(DispatchError::not_served(
                vendor,
                format!("{city} is outside the service area"),
            ));
        }

        let candidates: Vec<DispatcherLocation> = self
            .directory
            .locations(vendor)
            .await?
            .into_iter()
            .filter(|l| l.is_active() && l.covers_city(&city))
            .collect();
        if candidates.is_empty() {
            return Err(DispatchError::not_served(
                vendor,
                format!("no active location covers {city}"),
            ));
        }

        let origin = match self.pickup_point(pickup).await {
            Ok(point) => *point,
            Err(message) => {
                return Err(DispatchError::route_unresolvable(
                    vendor,
                    format!("pickup address: {message}"),
                ));
            }
        };

        let measured = join_all(candidates.into_iter().map(|location| async move {
            let point = self.coordinate_of(&location).await;
            (location, point)
        }))
        .await;

        let nearest = measured
            .into_iter()
            .filter_map(|(location, point)| match point {
                Some(point) => Some((location, point.distance_km(&origin))),
                None => {
                    debug!(location = %location.id(), "candidate skipped, coordinate unavailable");
                    None
                }
            })
            .min_by(|(a, da), (b, db)| {
                da.partial_cmp(db)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.id().cmp(&b.id()))
            });

        let Some((location, distance_km)) = nearest else {
            return Err(DispatchError::route_unresolvable(
                vendor,
                "no candidate location could be located",
            ));
        };

        if distance_km > area.max_radius_km() {
            return Err(DispatchError::not_served(
                vendor,
                format!(
                    "nearest location {} is {distance_km:.1} km away, limit {:.0} km",
                    location.name(),
                    area.max_radius_km()
                ),
            ));
        }

        debug!(
            location = %location.id(),
            distance_km,
            city = %city,
            "dispatcher selected"
        );
        Ok(DispatchSelection {
            location,
            distance_km,
            city,
            city_match,
        })
    }

    async fn pickup_point<'p>(&self, pickup: &'p Pickup) -> &'p Result<GeoPoint, String> {
        pickup
            .point
            .get_or_init(|| async {
                self.geo
                    .geocode(pickup.address())
                    .await
                    .map_err(|e| e.to_string())
            })
            .await
    }

    async fn coordinate_of(&self, location: &DispatcherLocation) -> Option<GeoPoint> {
        if let Some(point) = location.coordinate() {
            return Some(point);
        }
        self.geo.geocode(location.address()).await.ok()
    }
}

fn resolve_city(address: &str, known: &[String], area: &ServiceArea) -> (String, CityMatch) {
    match match_city(address, known.iter().map(String::as_str)) {
        Some(city) => (city.to_string(), CityMatch::Matched),
        None => {
            debug!(
                vendor = %area.vendor(),
                primary_city = area.primary_city(),
                "no known city in address, assuming primary city"
            );
            (area.primary_city().to_string(), CityMatch::PrimaryCityFallback)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::DispatcherLocation;
    use crate::domain::value_objects::LocationId;
    use crate::infrastructure::geo::InMemoryGeoResolver;
    use crate::infrastructure::persistence::InMemoryDispatcherDirectory;

    fn selector() -> (GeographicDispatchSelector, InMemoryDispatcherDirectory, InMemoryGeoResolver) {
        let directory = InMemoryDispatcherDirectory::builtin().unwrap();
        let geo = InMemoryGeoResolver::new();
        let selector =
            GeographicDispatchSelector::new(Arc::new(directory.clone()), Arc::new(geo.clone()));
        (selector, directory, geo)
    }

    #[tokio::test]
    async fn picks_nearest_covering_location() {
        let (selector, _, _) = selector();
        let selection = selector
            .select(VendorId::MetroMovers, "250 Front St W, Toronto, ON")
            .await
            .unwrap();
        assert_eq!(selection.location.id(), LocationId::new(1));
        assert_eq!(selection.city, "Toronto");
        assert_eq!(selection.city_match, CityMatch::Matched);
        assert!(selection.distance_km < 5.0);

        let selection = selector
            .select(VendorId::MetroMovers, "10 Main St, Markham, ON")
            .await
            .unwrap();
        assert_eq!(selection.location.id(), LocationId::new(3));
    }

    #[tokio::test]
    async fn location_coverage_restricts_candidates() {
        let (selector, _, _) = selector();
        // The Oshawa depot only covers the eastern suburbs.
        let selection = selector
            .select(VendorId::EasyHaul, "99 Ellesmere Rd, Scarborough, ON")
            .await
            .unwrap();
        assert_eq!(selection.location.id(), LocationId::new(20));

        let selection = selector
            .select(VendorId::EasyHaul, "1 Dundas St, Whitby, ON")
            .await
            .unwrap();
        assert_eq!(selection.location.id(), LocationId::new(21));
    }

    #[tokio::test]
    async fn city_outside_area_is_not_served() {
        let (selector, _, _) = selector();
        let err = selector
            .select(VendorId::Northline, "1 Main St, Oshawa, ON")
            .await
            .unwrap_err();
        assert!(err.is_not_served());
    }

    #[tokio::test]
    async fn unknown_city_falls_back_to_primary() {
        let (selector, _, geo) = selector();
        geo.set_address(
            "RR 2, Unnamed Township",
            GeoPoint::new(43.6500, -79.6000).unwrap(),
        );
        let selection = selector
            .select(VendorId::Northline, "RR 2, Unnamed Township")
            .await
            .unwrap();
        assert_eq!(selection.city, "Mississauga");
        assert_eq!(selection.city_match, CityMatch::PrimaryCityFallback);
        assert_eq!(selection.location.id(), LocationId::new(10));
    }

    #[tokio::test]
    async fn radius_is_enforced() {
        let (selector, _, geo) = selector();
        // Claims Toronto but geocodes near Barrie, beyond Easy Haul's 60 km.
        geo.set_address(
            "Toronto Rd, Barrie",
            GeoPoint::new(44.3894, -79.6903).unwrap(),
        );
        let err = selector
            .select(VendorId::EasyHaul, "Toronto Rd, Barrie")
            .await
            .unwrap_err();
        assert!(err.is_not_served());
        assert!(err.to_string().contains("limit 60 km"));
    }

    #[tokio::test]
    async fn inactive_locations_are_skipped() {
        let (selector, directory, _) = selector();
        directory.deactivate(LocationId::new(1)).await.unwrap();
        let selection = selector
            .select(VendorId::MetroMovers, "1 King St, Toronto, ON")
            .await
            .unwrap();
        assert_ne!(selection.location.id(), LocationId::new(1));
    }

    #[tokio::test]
    async fn ties_go_to_lowest_id() {
        let directory = InMemoryDispatcherDirectory::new();
        directory
            .put_service_area(
                ServiceArea::new(VendorId::Velocity, "Toronto", ["Toronto"], 100.0).unwrap(),
            )
            .await;
        let point = GeoPoint::new(43.70, -79.40).unwrap();
        for id in [9, 4] {
            directory
                .upsert_location(
                    DispatcherLocation::new(
                        LocationId::new(id),
                        VendorId::Velocity,
                        format!("Depot {id}"),
                        "Toronto",
                    )
                    .with_coordinate(point),
                )
                .await
                .unwrap();
        }
        let selector = GeographicDispatchSelector::new(
            Arc::new(directory),
            Arc::new(InMemoryGeoResolver::new()),
        );
        let selection = selector.select(VendorId::Velocity, "Toronto").await.unwrap();
        assert_eq!(selection.location.id(), LocationId::new(4));
    }

    #[tokio::test]
    async fn unlocatable_candidate_is_excluded() {
        let directory = InMemoryDispatcherDirectory::new();
        directory
            .put_service_area(
                ServiceArea::new(VendorId::Velocity, "Toronto", ["Toronto"], 100.0).unwrap(),
            )
            .await;
        directory
            .upsert_location(DispatcherLocation::new(
                LocationId::new(1),
                VendorId::Velocity,
                "Lost Depot",
                "Nowhere In Particular",
            ))
            .await
            .unwrap();
        directory
            .upsert_location(DispatcherLocation::new(
                LocationId::new(2),
                VendorId::Velocity,
                "Found Depot",
                "Somewhere, Toronto",
            ))
            .await
            .unwrap();
        let selector = GeographicDispatchSelector::new(
            Arc::new(directory),
            Arc::new(InMemoryGeoResolver::new()),
        );
        let selection = selector.select(VendorId::Velocity, "Toronto").await.unwrap();
        assert_eq!(selection.location.id(), LocationId::new(2));
    }

    #[tokio::test]
    async fn unresolvable_pickup_is_reported() {
        let (selector, _, geo) = selector();
        geo.set_unresolvable("1 Queen St, Toronto");
        let err = selector
            .select(VendorId::MetroMovers, "1 Queen St, Toronto")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::RouteUnresolvable { .. }));
    }

    #[tokio::test]
    async fn shared_pickup_is_geocoded_once() {
        let (selector, _, geo) = selector();
        let pickup = Pickup::new("250 Front St W, Toronto, ON");

        let selections =
            join_all(VendorId::ALL.map(|vendor| selector.select_for(vendor, &pickup))).await;

        assert!(selections.iter().filter(|s| s.is_ok()).count() >= 2);
        assert_eq!(geo.geocode_calls(), 1);

        selector
            .select(VendorId::MetroMovers, "250 Front St W, Toronto, ON")
            .await
            .unwrap();
        assert_eq!(geo.geocode_calls(), 2);
    }

    #[tokio::test]
    async fn shared_pickup_reuses_failed_geocode() {
        let (selector, _, geo) = selector();
        geo.set_unresolvable("1 Queen St, Toronto");
        let pickup = Pickup::new("1 Queen St, Toronto");

        for vendor in [VendorId::MetroMovers, VendorId::Velocity] {
            let err = selector.select_for(vendor, &pickup).await.unwrap_err();
            assert!(matches!(
                err,
                DispatchError::RouteUnresolvable { vendor: v, .. } if v == vendor
            ));
        }
        assert_eq!(geo.geocode_calls(), 1);
    }

    #[tokio::test]
    async fn directory_outage_propagates() {
        let (selector, directory, _) = selector();
        directory.set_offline(true);
        let err = selector
            .select(VendorId::MetroMovers, "Toronto")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Directory(_)));
    }
}
