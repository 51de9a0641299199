//! # In-Memory Directory
//!
//! In-memory dispatcher directory, seeded at startup.
//!
//! ## Thread Safety
//!
//! State lives behind `Arc<RwLock<..>>`; clones share it.

pub mod dispatcher_directory;

pub use dispatcher_directory::InMemoryDispatcherDirectory;
