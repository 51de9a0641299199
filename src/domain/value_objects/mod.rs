//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`RequestId`]: UUID-based quote request identifier
//! - [`LocationId`]: Numeric dispatcher location identifier
//! - [`LocationKey`]: Pricing location name
//!
//! ## Calendar and Geography
//!
//! - [`DayOfYear`], [`DayRange`]: Year-less day keys used by the pricing feed
//! - [`GeoPoint`], [`RouteMetrics`]: Coordinates and driving routes
//! - [`TravelMetrics`]: Route legs of a move
//!
//! ## Domain Enums
//!
//! - `VendorId`: The quoting vendors
//! - `HeavyItem`: Surcharged items
//! - `AdditionalService`: Optional services

pub mod day_of_year;
pub mod enums;
pub mod geo;
pub mod ids;
pub mod money;
pub mod timestamp;
pub mod travel;

pub use day_of_year::{DayOfYear, DayRange};
pub use enums::{AdditionalService, HeavyItem, ParseEnumError, VendorId};
pub use geo::{GeoPoint, RouteMetrics};
pub use ids::{LocationId, LocationKey, RequestId};
pub use timestamp::Timestamp;
pub use travel::TravelMetrics;
