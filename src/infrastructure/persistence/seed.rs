//! # Directory Seed
//!
//! TOML description of service areas and dispatcher locations.
//!
//! ```toml
//! [[vendors]]
//! id = "northline"
//! display_name = "Northline Moving"
//! primary_city = "Mississauga"
//! max_radius_km = 100.0
//! cities = ["Toronto", "Mississauga"]
//!
//! [[locations]]
//! id = 10
//! vendor = "northline"
//! name = "Mississauga Depot"
//! address = "2000 Argentia Rd, Mississauga, ON"
//! lat = 43.6035
//! lng = -79.7480
//! cities = ["Mississauga"]   # optional per-location coverage
//! pricing_key = "Mississauga" # optional, defaults to name
//! active = true               # optional
//! ```

use super::traits::{DirectoryError, DirectoryResult};
use crate::domain::entities::{DispatcherLocation, ServiceArea};
use crate::domain::value_objects::{GeoPoint, LocationId, LocationKey, VendorId};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// The built-in Greater Toronto seed.
const BUILTIN_SEED: &str = include_str!("../../../config/directory_seed.toml");

/// Vendor entry of a seed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VendorSeed {
    /// Vendor id.
    pub id: VendorId,
    /// Display name; informational only.
    #[serde(default)]
    pub display_name: Option<String>,
    /// City used when an address names no known city.
    pub primary_city: String,
    /// Maximum dispatcher-to-pickup distance.
    pub max_radius_km: f64,
    /// Served cities.
    pub cities: Vec<String>,
}

/// Location entry of a seed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationSeed {
    /// Location id, unique across vendors.
    pub id: u32,
    /// Owning vendor.
    pub vendor: VendorId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Latitude, when known.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude, when known.
    #[serde(default)]
    pub lng: Option<f64>,
    /// Whether the location takes jobs.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Cities this location covers; empty means the whole service area.
    #[serde(default)]
    pub cities: Vec<String>,
    /// Key used for pricing lookups.
    #[serde(default)]
    pub pricing_key: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Parsed seed file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DirectorySeed {
    /// Vendor service areas.
    #[serde(default)]
    pub vendors: Vec<VendorSeed>,
    /// Dispatcher locations.
    #[serde(default)]
    pub locations: Vec<LocationSeed>,
}

impl DirectorySeed {
    /// The built-in seed.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidSeed` if the embedded seed is broken.
    pub fn builtin() -> DirectoryResult<Self> {
        Self::from_toml_str(BUILTIN_SEED)
    }

    /// Parses a seed from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidSeed` on syntax or shape errors.
    pub fn from_toml_str(text: &str) -> DirectoryResult<Self> {
        toml::from_str(text).map_err(|e| DirectoryError::invalid_seed(e.to_string()))
    }

    /// Reads and parses a seed file.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidSeed` if the file cannot be read or
    /// parsed.
    pub fn from_file(path: impl AsRef<Path>) -> DirectoryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            DirectoryError::invalid_seed(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds validated service areas and locations.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Duplicate` for repeated vendors or location
    /// ids, and `DirectoryError::InvalidSeed` for invalid areas, coordinates
    /// or locations of unconfigured vendors.
    pub fn build(&self) -> DirectoryResult<(Vec<ServiceArea>, Vec<DispatcherLocation>)> {
        let mut vendors = HashSet::new();
        let mut areas = Vec::with_capacity(self.vendors.len());
        for vendor in &self.vendors {
            if !vendors.insert(vendor.id) {
                return Err(DirectoryError::duplicate("ServiceArea", vendor.id.as_str()));
            }
            let area = ServiceArea::new(
                vendor.id,
                vendor.primary_city.clone(),
                vendor.cities.iter().cloned(),
                vendor.max_radius_km,
            )
            .map_err(|e| DirectoryError::invalid_seed(e.to_string()))?;
            areas.push(area);
        }

        let mut ids = HashSet::new();
        let mut locations = Vec::with_capacity(self.locations.len());
        for seed in &self.locations {
            if !ids.insert(seed.id) {
                return Err(DirectoryError::duplicate(
                    "DispatcherLocation",
                    LocationId::new(seed.id).to_string(),
                ));
            }
            if !vendors.contains(&seed.vendor) {
                return Err(DirectoryError::invalid_seed(format!(
                    "location {} references vendor {} without a service area",
                    seed.id, seed.vendor
                )));
            }
            locations.push(seed.to_location()?);
        }
        Ok((areas, locations))
    }
}

impl LocationSeed {
    fn to_location(&self) -> DirectoryResult<DispatcherLocation> {
        let mut location = DispatcherLocation::new(
            LocationId::new(self.id),
            self.vendor,
            self.name.clone(),
            self.address.clone(),
        )
        .with_active(self.active)
        .with_served_cities(self.cities.iter().cloned());

        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                let point = GeoPoint::new(lat, lng).map_err(|e| {
                    DirectoryError::invalid_seed(format!("location {}: {e}", self.id))
                })?;
                location = location.with_coordinate(point);
            }
            (None, None) => {}
            _ => {
                return Err(DirectoryError::invalid_seed(format!(
                    "location {} must give both lat and lng or neither",
                    self.id
                )));
            }
        }

        if let Some(key) = &self.pricing_key {
            let key = LocationKey::new(key);
            if key.is_empty() {
                return Err(DirectoryError::invalid_seed(format!(
                    "location {} has an empty pricing key",
                    self.id
                )));
            }
            location = location.with_pricing_key(key);
        }
        Ok(location)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_covers_every_vendor() {
        let (areas, locations) = DirectorySeed::builtin().unwrap().build().unwrap();
        assert_eq!(areas.len(), 4);
        for vendor in VendorId::ALL {
            assert!(
                locations.iter().any(|l| l.vendor() == vendor),
                "{vendor} has no location"
            );
        }
        let toronto = locations.iter().find(|l| l.id() == LocationId::new(1)).unwrap();
        assert_eq!(toronto.pricing_key().as_str(), "Toronto");
        assert!(toronto.coordinate().is_some());

        let velocity_cities: Vec<_> = locations
            .iter()
            .filter(|l| l.vendor() == VendorId::Velocity)
            .map(|l| l.name().to_string())
            .collect();
        assert_eq!(
            velocity_cities,
            vec!["Toronto Depot", "Ottawa Depot", "Vancouver Depot"]
        );
    }

    #[test]
    fn pricing_key_defaults_to_name() {
        let seed = DirectorySeed::from_toml_str(
            r#"
            [[vendors]]
            id = "metro_movers"
            primary_city = "Toronto"
            max_radius_km = 50.0
            cities = ["Toronto"]

            [[locations]]
            id = 7
            vendor = "metro_movers"
            name = "Downtown"
            address = "1 King St, Toronto"
            "#,
        )
        .unwrap();
        let (_, locations) = seed.build().unwrap();
        assert_eq!(locations[0].pricing_key().as_str(), "Downtown");
        assert!(locations[0].coordinate().is_none());
        assert!(locations[0].is_active());
    }

    #[test]
    fn rejects_duplicate_location_ids() {
        let seed = DirectorySeed::from_toml_str(
            r#"
            [[vendors]]
            id = "velocity"
            primary_city = "Toronto"
            max_radius_km = 50.0
            cities = ["Toronto"]

            [[locations]]
            id = 1
            vendor = "velocity"
            name = "A"
            address = "a"

            [[locations]]
            id = 1
            vendor = "velocity"
            name = "B"
            address = "b"
            "#,
        )
        .unwrap();
        assert!(matches!(
            seed.build(),
            Err(DirectoryError::Duplicate { .. })
        ));
    }

    #[test]
    fn rejects_orphan_location_and_half_coordinates() {
        let orphan = DirectorySeed::from_toml_str(
            r#"
            [[locations]]
            id = 1
            vendor = "easy_haul"
            name = "A"
            address = "a"
            "#,
        )
        .unwrap();
        assert!(matches!(orphan.build(), Err(DirectoryError::InvalidSeed(_))));

        let half = DirectorySeed::from_toml_str(
            r#"
            [[vendors]]
            id = "easy_haul"
            primary_city = "Toronto"
            max_radius_km = 50.0
            cities = ["Toronto"]

            [[locations]]
            id = 1
            vendor = "easy_haul"
            name = "A"
            address = "a"
            lat = 43.0
            "#,
        )
        .unwrap();
        assert!(matches!(half.build(), Err(DirectoryError::InvalidSeed(_))));
    }

    #[test]
    fn rejects_unknown_vendor_id() {
        let result = DirectorySeed::from_toml_str(
            r#"
            [[vendors]]
            id = "acme"
            primary_city = "Toronto"
            max_radius_km = 50.0
            cities = ["Toronto"]
            "#,
        );
        assert!(matches!(result, Err(DirectoryError::InvalidSeed(_))));
    }
}
