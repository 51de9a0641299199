//! # Application Layer
//!
//! Services that coordinate the domain strategies with the directory, geo
//! and pricing ports.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{QuoteBatch, QuoteOrchestrator};
