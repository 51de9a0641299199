//! # Infrastructure Layer
//!
//! Adapters for the collaborators the quote core talks to.
//!
//! - [`http`]: Shared JSON HTTP client
//! - [`geo`]: Geocoding and routing
//! - [`pricing_feed`]: Normalized pricing records
//! - [`persistence`]: Dispatcher directory
//! - [`notifications`]: Quote batch hand-off

pub mod geo;
pub mod http;
pub mod notifications;
pub mod persistence;
pub mod pricing_feed;
