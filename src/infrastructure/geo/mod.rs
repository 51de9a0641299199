//! # Geocoding and Routing
//!
//! The [`GeoResolver`] port and its adapters.
//!
//! - [`HttpGeoResolver`]: external geocoding/routing service, rate limited
//! - [`InMemoryGeoResolver`]: known-city table with great-circle estimates,
//!   used for development and tests

pub mod http_resolver;
pub mod in_memory;
pub mod traits;

pub use http_resolver::HttpGeoResolver;
pub use in_memory::InMemoryGeoResolver;
pub use traits::{GeoError, GeoResolver, GeoResult};
