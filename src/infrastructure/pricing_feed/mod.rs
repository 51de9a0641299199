//! # Pricing Feed
//!
//! The [`PricingFeed`] port delivers normalized pricing records for a
//! location. Raw spreadsheet ingestion happens upstream; this crate only
//! consumes the record shape.
//!
//! - [`HttpPricingFeed`]: JSON endpoint of the ingestion service
//! - [`InMemoryPricingFeed`]: static records with fault injection

pub mod http_feed;
pub mod in_memory;
pub mod traits;

pub use http_feed::HttpPricingFeed;
pub use in_memory::InMemoryPricingFeed;
pub use traits::{FeedError, FeedResult, PricingFeed};
