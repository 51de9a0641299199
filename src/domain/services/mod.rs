//! # Domain Services
//!
//! Domain services encapsulating business logic that doesn't naturally
//! belong to a single entity or value object.
//!
//! ## Services
//!
//! - [`quote_engine`]: The per-vendor pricing strategies and the rules they
//!   share

pub mod quote_engine;

pub use quote_engine::{QuoteContext, QuoteEngineRegistry, TravelLimits, VendorQuoteEngine};
