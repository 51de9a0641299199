//! # In-Memory Geo Resolver
//!
//! Offline resolver backed by a table of known city centres.
//!
//! Addresses geocode to the centre of the longest city name they contain.
//! Routes are estimated from the great-circle distance with a road winding
//! factor and an average truck-route speed. Explicit address and route
//! overrides take precedence, which lets tests pin exact figures.

use super::traits::{GeoError, GeoResolver, GeoResult};
use crate::domain::entities::service_area::{city_key, match_city};
use crate::domain::value_objects::{GeoPoint, RouteMetrics};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Great-circle to road distance.
const ROAD_FACTOR: f64 = 1.25;
/// Local driving at both ends, in km.
const LOCAL_KM: f64 = 2.0;
/// Average speed, km/h.
const AVERAGE_SPEED_KMH: f64 = 80.0;
/// Loading-dock and city-traffic allowance, hours.
const FIXED_HOURS: f64 = 0.15;

/// City centres known to the default resolver.
const CITY_CENTRES: &[(&str, f64, f64)] = &[
    ("Toronto", 43.6532, -79.3832),
    ("North York", 43.7615, -79.4111),
    ("Scarborough", 43.7764, -79.2318),
    ("Etobicoke", 43.6205, -79.5132),
    ("Mississauga", 43.5890, -79.6441),
    ("Brampton", 43.7315, -79.7624),
    ("Markham", 43.8561, -79.3370),
    ("Vaughan", 43.8361, -79.4983),
    ("Richmond Hill", 43.8828, -79.4403),
    ("Oakville", 43.4675, -79.6877),
    ("Burlington", 43.3255, -79.7990),
    ("Hamilton", 43.2557, -79.8711),
    ("Pickering", 43.8384, -79.0868),
    ("Ajax", 43.8509, -79.0204),
    ("Whitby", 43.8975, -78.9429),
    ("Oshawa", 43.8971, -78.8658),
    ("Barrie", 44.3894, -79.6903),
    ("Kitchener", 43.4516, -80.4925),
    ("London", 42.9849, -81.2453),
    ("Kingston", 44.2312, -76.4860),
    ("Ottawa", 45.4215, -75.6972),
    ("Montreal", 45.5019, -73.5674),
    ("Winnipeg", 49.8951, -97.1384),
    ("Calgary", 51.0447, -114.0719),
    ("Edmonton", 53.5461, -113.4938),
    ("Vancouver", 49.2827, -123.1207),
];

#[derive(Debug, Default)]
struct Overrides {
    addresses: HashMap<String, GeoPoint>,
    routes: HashMap<(String, String), RouteMetrics>,
    unresolvable: HashSet<String>,
}

/// Table-driven geo resolver.
#[derive(Debug, Clone)]
pub struct InMemoryGeoResolver {
    cities: Arc<Vec<(String, GeoPoint)>>,
    overrides: Arc<RwLock<Overrides>>,
    geocode_calls: Arc<AtomicU64>,
    route_calls: Arc<AtomicU64>,
}

impl Default for InMemoryGeoResolver {
    fn default() -> Self {
        let cities = CITY_CENTRES
            .iter()
            .filter_map(|(name, lat, lng)| {
                GeoPoint::new(*lat, *lng)
                    .ok()
                    .map(|point| ((*name).to_string(), point))
            })
            .collect();
        Self::with_cities(cities)
    }
}

impl InMemoryGeoResolver {
    /// Resolver with the built-in Canadian city table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with a custom city table.
    #[must_use]
    pub fn with_cities(cities: Vec<(String, GeoPoint)>) -> Self {
        Self {
            cities: Arc::new(cities),
            overrides: Arc::new(RwLock::new(Overrides::default())),
            geocode_calls: Arc::new(AtomicU64::new(0)),
            route_calls: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Pins an address to a coordinate.
    pub fn set_address(&self, address: &str, point: GeoPoint) {
        self.overrides
            .write()
            .addresses
            .insert(city_key(address), point);
    }

    /// Pins the route between two addresses (both directions).
    pub fn set_route(&self, from: &str, to: &str, metrics: RouteMetrics) {
        let mut overrides = self.overrides.write();
        overrides
            .routes
            .insert((city_key(from), city_key(to)), metrics);
        overrides
            .routes
            .insert((city_key(to), city_key(from)), metrics);
    }

    /// Makes every lookup involving the address fail.
    pub fn set_unresolvable(&self, address: &str) {
        self.overrides.write().unresolvable.insert(city_key(address));
    }

    /// Names of the known cities.
    #[must_use]
    pub fn city_names(&self) -> Vec<String> {
        self.cities.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Geocode calls served so far.
    #[must_use]
    pub fn geocode_calls(&self) -> u64 {
        self.geocode_calls.load(Ordering::Relaxed)
    }

    /// Route calls served so far.
    #[must_use]
    pub fn route_calls(&self) -> u64 {
        self.route_calls.load(Ordering::Relaxed)
    }

    fn locate(&self, address: &str) -> GeoResult<GeoPoint> {
        let key = city_key(address);
        {
            let overrides = self.overrides.read();
            if overrides.unresolvable.contains(&key) {
                return Err(GeoError::not_found(address));
            }
            if let Some(point) = overrides.addresses.get(&key) {
                return Ok(*point);
            }
        }
        let city = match_city(address, self.cities.iter().map(|(name, _)| name.as_str()))
            .ok_or_else(|| GeoError::not_found(address))?;
        self.cities
            .iter()
            .find(|(name, _)| name == city)
            .map(|(_, point)| *point)
            .ok_or_else(|| GeoError::not_found(address))
    }

    /// Road estimate between two coordinates.
    #[must_use]
    pub fn estimate(from: &GeoPoint, to: &GeoPoint) -> RouteMetrics {
        let road_km = from.distance_km(to) * ROAD_FACTOR + LOCAL_KM;
        let hours = road_km / AVERAGE_SPEED_KMH + FIXED_HOURS;
        RouteMetrics::new(road_km * 1_000.0, hours * 3_600.0)
    }
}

#[async_trait]
impl GeoResolver for InMemoryGeoResolver {
    async fn geocode(&self, address: &str) -> GeoResult<GeoPoint> {
        self.geocode_calls.fetch_add(1, Ordering::Relaxed);
        self.locate(address)
    }

    async fn route(&self, from: &str, to: &str) -> GeoResult<RouteMetrics> {
        self.route_calls.fetch_add(1, Ordering::Relaxed);
        let pinned = self
            .overrides
            .read()
            .routes
            .get(&(city_key(from), city_key(to)))
            .copied();
        if let Some(metrics) = pinned {
            return Ok(metrics);
        }
        let origin = self.locate(from)?;
        let destination = self.locate(to)?;
        Ok(Self::estimate(&origin, &destination))
    }
}
