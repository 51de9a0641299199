//! # Quote Request
//!
//! Description of a move to be priced by every serving vendor.
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::entities::quote_request::QuoteRequest;
//! use move_quote::domain::value_objects::{HeavyItem, AdditionalService};
//! use chrono::NaiveDate;
//!
//! let request = QuoteRequest::new(
//!     "Toronto, ON",
//!     "Mississauga, ON",
//!     NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
//!     3,
//! )
//! .with_heavy_item(HeavyItem::Piano, 1)
//! .with_service(AdditionalService::Packing);
//!
//! assert!(request.validate().is_ok());
//! assert!(request.has_crew_upgrading_item());
//! assert_eq!(request.estimated_weight_lbs(), 4_000);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{AdditionalService, HeavyItem, RequestId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Pounds assumed per room on top of the base load.
const LBS_PER_ROOM: u32 = 1_000;
/// Base load for any move, in pounds.
const BASE_LOAD_LBS: u32 = 1_000;
/// Pounds assumed per square foot when floor area is known.
const LBS_PER_SQUARE_FOOT: u32 = 7;
/// Upper bound on rooms accepted.
const MAX_ROOMS: u32 = 50;
/// Upper bound on stair flights per end.
const MAX_FLIGHTS: u32 = 30;

/// A request for moving quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Request identifier, generated when absent.
    #[serde(default = "RequestId::new_v4")]
    pub id: RequestId,
    /// Pickup address.
    pub origin_address: String,
    /// Dropoff address.
    pub destination_address: String,
    /// Move date.
    pub move_date: NaiveDate,
    /// Preferred start time.
    #[serde(default)]
    pub move_time: Option<NaiveTime>,
    /// Number of rooms (0 for a studio or storage locker).
    pub rooms: u32,
    /// Floor area in square feet.
    #[serde(default)]
    pub square_feet: Option<u32>,
    /// Customer-supplied load weight in pounds.
    #[serde(default)]
    pub weight_lbs: Option<u32>,
    /// Heavy item counts.
    #[serde(default)]
    pub heavy_items: BTreeMap<HeavyItem, u32>,
    /// Stair flights at pickup.
    #[serde(default)]
    pub stairs_pickup: u32,
    /// Stair flights at dropoff.
    #[serde(default)]
    pub stairs_dropoff: u32,
    /// Elevator at pickup.
    #[serde(default)]
    pub elevator_pickup: bool,
    /// Elevator at dropoff.
    #[serde(default)]
    pub elevator_dropoff: bool,
    /// Requested additional services.
    #[serde(default)]
    pub services: BTreeSet<AdditionalService>,
}

impl QuoteRequest {
    /// Creates a request with no extras.
    #[must_use]
    pub fn new(
        origin_address: impl Into<String>,
        destination_address: impl Into<String>,
        move_date: NaiveDate,
        rooms: u32,
    ) -> Self {
        Self {
            id: RequestId::new_v4(),
            origin_address: origin_address.into(),
            destination_address: destination_address.into(),
            move_date,
            move_time: None,
            rooms,
            square_feet: None,
            weight_lbs: None,
            heavy_items: BTreeMap::new(),
            stairs_pickup: 0,
            stairs_dropoff: 0,
            elevator_pickup: false,
            elevator_dropoff: false,
            services: BTreeSet::new(),
        }
    }

    /// Sets the preferred start time.
    #[must_use]
    pub fn with_move_time(mut self, time: NaiveTime) -> Self {
        self.move_time = Some(time);
        self
    }

    /// Sets the floor area.
    #[must_use]
    pub fn with_square_feet(mut self, square_feet: u32) -> Self {
        self.square_feet = Some(square_feet);
        self
    }

    /// Sets an explicit load weight.
    #[must_use]
    pub fn with_weight_lbs(mut self, weight_lbs: u32) -> Self {
        self.weight_lbs = Some(weight_lbs);
        self
    }

    /// Adds heavy items; counts accumulate.
    #[must_use]
    pub fn with_heavy_item(mut self, item: HeavyItem, count: u32) -> Self {
        if count > 0 {
            *self.heavy_items.entry(item).or_insert(0) += count;
        }
        self
    }

    /// Sets stair flights at both ends.
    #[must_use]
    pub fn with_stairs(mut self, pickup: u32, dropoff: u32) -> Self {
        self.stairs_pickup = pickup;
        self.stairs_dropoff = dropoff;
        self
    }

    /// Sets elevator availability at both ends.
    #[must_use]
    pub fn with_elevators(mut self, pickup: bool, dropoff: bool) -> Self {
        self.elevator_pickup = pickup;
        self.elevator_dropoff = dropoff;
        self
    }

    /// Adds an additional service.
    #[must_use]
    pub fn with_service(mut self, service: AdditionalService) -> Self {
        self.services.insert(service);
        self
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRequest` for blank addresses, identical
    /// origin and destination, or implausible sizes.
    pub fn validate(&self) -> DomainResult<()> {
        if self.origin_address.trim().is_empty() {
            return Err(DomainError::invalid_request("origin address is required"));
        }
        if self.destination_address.trim().is_empty() {
            return Err(DomainError::invalid_request(
                "destination address is required",
            ));
        }
        if self.rooms > MAX_ROOMS {
            return Err(DomainError::invalid_request(format!(
                "room count {} exceeds {MAX_ROOMS}",
                self.rooms
            )));
        }
        if self.stairs_pickup > MAX_FLIGHTS || self.stairs_dropoff > MAX_FLIGHTS {
            return Err(DomainError::invalid_request(format!(
                "stair flights must not exceed {MAX_FLIGHTS}"
            )));
        }
        if self.weight_lbs == Some(0) {
            return Err(DomainError::invalid_request("weight must be positive"));
        }
        Ok(())
    }

    /// Load weight: the explicit figure, else an estimate from rooms and
    /// floor area (whichever is larger).
    #[must_use]
    pub fn estimated_weight_lbs(&self) -> u32 {
        if let Some(weight) = self.weight_lbs {
            return weight;
        }
        let by_rooms = BASE_LOAD_LBS.saturating_add(self.rooms.saturating_mul(LBS_PER_ROOM));
        let by_area = self
            .square_feet
            .map_or(0, |sqft| sqft.saturating_mul(LBS_PER_SQUARE_FOOT));
        by_rooms.max(by_area)
    }

    /// Returns true if any requested heavy item needs an extra mover.
    #[must_use]
    pub fn has_crew_upgrading_item(&self) -> bool {
        self.heavy_items
            .iter()
            .any(|(item, count)| *count > 0 && item.upgrades_crew())
    }

    /// Total stair flights across both ends.
    #[inline]
    #[must_use]
    pub fn total_flights(&self) -> u32 {
        self.stairs_pickup.saturating_add(self.stairs_dropoff)
    }

    /// Number of ends served by an elevator.
    #[inline]
    #[must_use]
    pub fn elevator_count(&self) -> u32 {
        u32::from(self.elevator_pickup) + u32::from(self.elevator_dropoff)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> QuoteRequest {
        QuoteRequest::new(
            "Toronto, ON",
            "Mississauga, ON",
            NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
            3,
        )
    }

    #[test]
    fn validate_rejects_blank_addresses() {
        let mut request = base();
        request.origin_address = "   ".to_string();
        assert!(request.validate().is_err());

        let mut request = base();
        request.destination_address = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn validate_rejects_implausible_sizes() {
        let mut request = base();
        request.rooms = 51;
        assert!(request.validate().is_err());

        assert!(base().with_stairs(31, 0).validate().is_err());
        assert!(base().with_weight_lbs(0).validate().is_err());
    }

    #[test]
    fn weight_estimate_uses_larger_signal() {
        assert_eq!(base().estimated_weight_lbs(), 4_000);
        assert_eq!(base().with_square_feet(1_000).estimated_weight_lbs(), 7_000);
        assert_eq!(base().with_weight_lbs(2_500).estimated_weight_lbs(), 2_500);
    }

    #[test]
    fn heavy_item_counts_accumulate() {
        let request = base()
            .with_heavy_item(HeavyItem::Treadmill, 1)
            .with_heavy_item(HeavyItem::Treadmill, 2)
            .with_heavy_item(HeavyItem::Safe, 0);
        assert_eq!(request.heavy_items.get(&HeavyItem::Treadmill), Some(&3));
        assert!(!request.heavy_items.contains_key(&HeavyItem::Safe));
        assert!(!request.has_crew_upgrading_item());
    }

    #[test]
    fn access_helpers() {
        let request = base().with_stairs(2, 1).with_elevators(true, false);
        assert_eq!(request.total_flights(), 3);
        assert_eq!(request.elevator_count(), 1);
    }

    #[test]
    fn deserializes_minimal_json() {
        let request: QuoteRequest = serde_json::from_value(serde_json::json!({
            "origin_address": "Toronto, ON",
            "destination_address": "Vancouver, BC",
            "move_date": "2025-10-01",
            "rooms": 4,
            "heavy_items": { "piano": 1 },
            "services": ["packing", "junk_removal"]
        }))
        .unwrap();
        assert_eq!(request.rooms, 4);
        assert!(request.has_crew_upgrading_item());
        assert_eq!(request.services.len(), 2);
        assert!(request.move_time.is_none());
    }
}
