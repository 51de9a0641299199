//! # API Layer
//!
//! External interfaces of the quote service.

pub mod rest;
