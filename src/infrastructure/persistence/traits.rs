//! # Directory Port
//!
//! The dispatcher directory: vendor service areas and their serving
//! locations. Configuration-lifetime data, read on every quote.
//!
//! # Examples
//!
//! ```ignore
//! use move_quote::infrastructure::persistence::traits::DispatcherDirectory;
//!
//! async fn active_depots(directory: &impl DispatcherDirectory, vendor: VendorId) {
//!     let locations = directory.locations(vendor).await?;
//!     let active = locations.iter().filter(|l| l.is_active()).count();
//!     println!("{vendor}: {active} active depots");
//! }
//! ```

use crate::domain::entities::{DispatcherLocation, ServiceArea};
use crate::domain::value_objects::{LocationId, LocationKey, VendorId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for directory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity in seed data.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Seed data is malformed.
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// The backing store cannot be reached.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

impl DirectoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an invalid seed error.
    #[must_use]
    pub fn invalid_seed(msg: impl Into<String>) -> Self {
        Self::InvalidSeed(msg.into())
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the directory itself is unreachable.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Registry of vendor service areas and dispatcher locations.
#[async_trait]
pub trait DispatcherDirectory: Send + Sync + fmt::Debug {
    /// Vendors with a configured service area, in stable order.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unavailable` if the directory is unreachable.
    async fn vendors(&self) -> DirectoryResult<Vec<VendorId>>;

    /// Service area of a vendor.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the vendor has no service area.
    async fn service_area(&self, vendor: VendorId) -> DirectoryResult<ServiceArea>;

    /// All locations of a vendor, active or not, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unavailable` if the directory is unreachable.
    async fn locations(&self, vendor: VendorId) -> DirectoryResult<Vec<DispatcherLocation>>;

    /// Canonical city names across every service area.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unavailable` if the directory is unreachable.
    async fn known_cities(&self) -> DirectoryResult<Vec<String>>;

    /// A location by id.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unavailable` if the directory is unreachable.
    async fn location(&self, id: LocationId) -> DirectoryResult<Option<DispatcherLocation>>;

    /// Pricing keys of active locations whose vendor uses dynamic pricing.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unavailable` if the directory is unreachable.
    async fn pricing_keys(&self) -> DirectoryResult<Vec<LocationKey>>;
}
