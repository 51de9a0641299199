//! # Move Quote Engine
//!
//! Multi-vendor quote engine for residential moving services.
//!
//! Given an origin, a destination and a description of the move, the engine
//! picks the serving dispatcher of every vendor that covers the route,
//! resolves travel metrics, looks up the vendor's pricing (a static rate card,
//! or a day-by-day snapshot fetched from an external feed and cached for four
//! hours) and produces an itemised cost breakdown per vendor. All vendors are
//! quoted concurrently under a single deadline; one vendor failing never
//! affects the others.
//!
//! ## Architecture
//!
//! The crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): value objects, entities and the four vendor
//!   pricing strategies
//! - **Application Layer** (`application`): pricing cache, dispatch selection
//!   and quote orchestration
//! - **Infrastructure Layer** (`infrastructure`): geocoding/routing, pricing
//!   feed, dispatcher directory and quote publishing adapters
//! - **API Layer** (`api`): REST interface
//!
//! ## Example
//!
//! ```rust,ignore
//! use move_quote::application::services::QuoteOrchestrator;
//!
//! let batch = orchestrator.generate(&request).await?;
//! for quote in batch.quotes {
//!     println!("{}: {:?}", quote.vendor(), quote.total_cost());
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
