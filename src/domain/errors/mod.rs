//! # Domain Errors
//!
//! Typed error types for domain operations.
//!
//! Error codes are organized by category:
//! - 1000-1999: Validation errors
//! - 2000-2999: Pricing data errors
//! - 3000-3999: Calculation errors
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::errors::{DomainError, DomainResult};
//!
//! fn validate_rooms(rooms: i64) -> DomainResult<u32> {
//!     u32::try_from(rooms).map_err(|_| DomainError::invalid_request("room count must be >= 0"))
//! }
//!
//! assert!(validate_rooms(-1).is_err());
//! ```

pub mod domain_error;

pub use domain_error::{DomainError, DomainResult};
