//! # Domain Layer
//!
//! Core business logic of the quote engine: value objects, entities, domain
//! errors and the vendor pricing strategies. Nothing in this layer performs
//! I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
