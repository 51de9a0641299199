//! # Persistence Layer
//!
//! The dispatcher directory port, its in-memory implementation and the
//! seed loader.
//!
//! ## Ports
//!
//! - [`DispatcherDirectory`]: Vendor service areas and dispatcher locations
//!
//! ## Implementations
//!
//! - `in_memory`: Seeded from TOML or the built-in Greater Toronto seed

pub mod in_memory;
pub mod seed;
pub mod traits;

pub use in_memory::InMemoryDispatcherDirectory;
pub use seed::DirectorySeed;
pub use traits::{DirectoryError, DirectoryResult, DispatcherDirectory};
