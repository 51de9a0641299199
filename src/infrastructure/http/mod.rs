//! # HTTP Transport
//!
//! Shared JSON-over-HTTP client used by the geo resolver and the pricing
//! feed adapters.

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::{HttpError, HttpResult};
