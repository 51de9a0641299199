//! # In-Memory Dispatcher Directory
//!
//! In-memory implementation of [`DispatcherDirectory`].
//!
//! Locations are never deleted; [`deactivate`](InMemoryDispatcherDirectory::deactivate)
//! takes one out of service.

use crate::domain::entities::{DispatcherLocation, ServiceArea};
use crate::domain::value_objects::{LocationId, LocationKey, VendorId};
use crate::infrastructure::persistence::seed::DirectorySeed;
use crate::infrastructure::persistence::traits::{
    DirectoryError, DirectoryResult, DispatcherDirectory,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Default)]
struct DirectoryState {
    areas: HashMap<VendorId, ServiceArea>,
    locations: BTreeMap<LocationId, DispatcherLocation>,
}

/// In-memory implementation of [`DispatcherDirectory`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryDispatcherDirectory {
    state: Arc<RwLock<DirectoryState>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryDispatcherDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory from a seed.
    ///
    /// # Errors
    ///
    /// Returns the seed's validation error.
    pub fn from_seed(seed: &DirectorySeed) -> DirectoryResult<Self> {
        let (areas, locations) = seed.build()?;
        let state = DirectoryState {
            areas: areas.into_iter().map(|a| (a.vendor(), a)).collect(),
            locations: locations.into_iter().map(|l| (l.id(), l)).collect(),
        };
        info!(
            vendors = state.areas.len(),
            locations = state.locations.len(),
            "dispatcher directory loaded"
        );
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            offline: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Creates a directory from the built-in seed.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidSeed` if the embedded seed is broken.
    pub fn builtin() -> DirectoryResult<Self> {
        Self::from_seed(&DirectorySeed::builtin()?)
    }

    /// Adds or replaces a vendor's service area.
    pub async fn put_service_area(&self, area: ServiceArea) {
        self.state.write().await.areas.insert(area.vendor(), area);
    }

    /// Adds or replaces a location.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidSeed` if the vendor has no service
    /// area.
    pub async fn upsert_location(&self, location: DispatcherLocation) -> DirectoryResult<()> {
        let mut state = self.state.write().await;
        if !state.areas.contains_key(&location.vendor()) {
            return Err(DirectoryError::invalid_seed(format!(
                "vendor {} has no service area",
                location.vendor()
            )));
        }
        state.locations.insert(location.id(), location);
        Ok(())
    }

    /// Takes a location out of service.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` for unknown ids.
    pub async fn deactivate(&self, id: LocationId) -> DirectoryResult<()> {
        let mut state = self.state.write().await;
        let location = state
            .locations
            .get_mut(&id)
            .ok_or_else(|| DirectoryError::not_found("DispatcherLocation", id.to_string()))?;
        location.deactivate();
        info!(location = %id, "dispatcher location deactivated");
        Ok(())
    }

    /// Simulates the backing store going away (or coming back).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> DirectoryResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(DirectoryError::unavailable("directory is offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DispatcherDirectory for InMemoryDispatcherDirectory {
    async fn vendors(&self) -> DirectoryResult<Vec<VendorId>> {
        self.ensure_online()?;
        let state = self.state.read().await;
        let mut vendors: Vec<VendorId> = state.areas.keys().copied().collect();
        vendors.sort();
        Ok(vendors)
    }

    async fn service_area(&self, vendor: VendorId) -> DirectoryResult<ServiceArea> {
        self.ensure_online()?;
        let state = self.state.read().await;
        state
            .areas
            .get(&vendor)
            .cloned()
            .ok_or_else(|| DirectoryError::not_found("ServiceArea", vendor.as_str()))
    }

    async fn locations(&self, vendor: VendorId) -> DirectoryResult<Vec<DispatcherLocation>> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state
            .locations
            .values()
            .filter(|l| l.vendor() == vendor)
            .cloned()
            .collect())
    }

    async fn known_cities(&self) -> DirectoryResult<Vec<String>> {
        self.ensure_online()?;
        let state = self.state.read().await;
        let mut seen = BTreeSet::new();
        let mut cities = Vec::new();
        let mut vendors: Vec<&VendorId> = state.areas.keys().collect();
        vendors.sort();
        for vendor in vendors {
            if let Some(area) = state.areas.get(vendor) {
                for city in area.cities() {
                    if seen.insert(city.to_lowercase()) {
                        cities.push(city.clone());
                    }
                }
            }
        }
        Ok(cities)
    }

    async fn location(&self, id: LocationId) -> DirectoryResult<Option<DispatcherLocation>> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state.locations.get(&id).cloned())
    }

    async fn pricing_keys(&self) -> DirectoryResult<Vec<LocationKey>> {
        self.ensure_online()?;
        let state = self.state.read().await;
        let keys: BTreeSet<LocationKey> = state
            .locations
            .values()
            .filter(|l| l.is_active() && l.vendor().uses_dynamic_pricing())
            .map(|l| l.pricing_key().clone())
            .collect();
        Ok(keys.into_iter().collect())
    }
}
