//! # Quote Publishing
//!
//! Hand-off of finished quote batches to downstream lead storage and
//! notification services. Quoting never waits on these.

pub mod in_memory;
pub mod logging;
pub mod traits;

pub use in_memory::InMemoryQuotePublisher;
pub use logging::LoggingQuotePublisher;
pub use traits::{PublishError, PublishResult, QuoteResultPublisher};
