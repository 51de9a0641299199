//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Per-vendor failures ([`DispatchError`], [`QuoteError`], [`PricingError`])
//! are contained inside quote generation and never reach the caller of
//! `generate`. [`ApplicationError`] is what the public operations return.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)          - invalid requests, normalization faults
//! ├── Directory(DirectoryError)    - dispatcher directory unreachable
//! ├── Pricing(PricingError)        - feed fetch or normalization failed
//! ├── Validation(String)           - input validation failures
//! ├── NotFound { .. }              - unknown location key or resource
//! └── Internal(String)             - unexpected faults
//!
//! DispatchError   - NotServed / RouteUnresolvable / Directory
//! QuoteError      - CalculationFault / MissingSnapshot / Dispatch / Pricing
//! ```
//!
//! # Examples
//!
//! ```
//! use move_quote::application::error::{ApplicationError, PricingError};
//!
//! let err = ApplicationError::validation("origin address is required");
//! assert!(err.is_validation());
//!
//! let err: ApplicationError = PricingError::unavailable("Toronto", "feed timed out").into();
//! assert!(err.is_pricing_unavailable());
//! ```

use crate::domain::errors::DomainError;
use crate::domain::value_objects::VendorId;
use crate::infrastructure::pricing_feed::FeedError;
use crate::infrastructure::persistence::DirectoryError;
use thiserror::Error;

// ============================================================================
// Pricing
// ============================================================================

/// Pricing cache failure for one location.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// The feed could not deliver a record.
    #[error("pricing unavailable for {key}: {message}")]
    Unavailable {
        /// Location key.
        key: String,
        /// Error message.
        message: String,
        /// Whether a later fetch may succeed.
        retryable: bool,
    },

    /// The feed delivered a record that could not be normalized.
    #[error("pricing normalization failed for {key}: {source}")]
    Normalization {
        /// Location key.
        key: String,
        /// Underlying domain error.
        source: DomainError,
    },
}

impl PricingError {
    /// Creates a retryable unavailable error.
    #[must_use]
    pub fn unavailable(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            key: key.into(),
            message: message.into(),
            retryable: true,
        }
    }

    /// Wraps a feed error for a location.
    #[must_use]
    pub fn from_feed(key: impl Into<String>, error: &FeedError) -> Self {
        Self::Unavailable {
            key: key.into(),
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }

    /// Creates a normalization error.
    #[must_use]
    pub fn normalization(key: impl Into<String>, source: DomainError) -> Self {
        Self::Normalization {
            key: key.into(),
            source,
        }
    }

    /// Location the error concerns.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Unavailable { key, .. } | Self::Normalization { key, .. } => key,
        }
    }

    /// Returns true if a later fetch may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable { retryable, .. } => *retryable,
            Self::Normalization { .. } => false,
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Dispatcher selection failure for one vendor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The vendor does not serve the origin. Expected, not an error
    /// condition for the caller.
    #[error("{vendor} does not serve this location: {reason}")]
    NotServed {
        /// Vendor.
        vendor: VendorId,
        /// Why no dispatcher qualified.
        reason: String,
    },

    /// Geocoding or routing failed for every leg that matters.
    #[error("route unresolvable for {vendor}: {message}")]
    RouteUnresolvable {
        /// Vendor.
        vendor: VendorId,
        /// Error message.
        message: String,
    },

    /// The dispatcher directory failed.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl DispatchError {
    /// Creates a not served error.
    #[must_use]
    pub fn not_served(vendor: VendorId, reason: impl Into<String>) -> Self {
        Self::NotServed {
            vendor,
            reason: reason.into(),
        }
    }

    /// Creates a route unresolvable error.
    #[must_use]
    pub fn route_unresolvable(vendor: VendorId, message: impl Into<String>) -> Self {
        Self::RouteUnresolvable {
            vendor,
            message: message.into(),
        }
    }

    /// Returns true if the vendor simply does not serve the location.
    #[inline]
    #[must_use]
    pub fn is_not_served(&self) -> bool {
        matches!(self, Self::NotServed { .. })
    }
}

// ============================================================================
// Quote
// ============================================================================

/// Failure of one vendor's quote task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    /// Dispatcher selection or route resolution failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The vendor's pricing snapshot could not be loaded.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The vendor needs a snapshot but none was supplied.
    #[error("{vendor} requires a pricing snapshot")]
    MissingSnapshot {
        /// Vendor.
        vendor: VendorId,
    },

    /// The strategy failed unexpectedly.
    #[error("calculation fault in {vendor}: {message}")]
    CalculationFault {
        /// Vendor.
        vendor: VendorId,
        /// Error message.
        message: String,
    },
}

impl QuoteError {
    /// Creates a calculation fault.
    #[must_use]
    pub fn calculation_fault(vendor: VendorId, message: impl Into<String>) -> Self {
        Self::CalculationFault {
            vendor,
            message: message.into(),
        }
    }

    /// Returns true if the vendor does not serve the request.
    #[must_use]
    pub fn is_not_served(&self) -> bool {
        matches!(self, Self::Dispatch(e) if e.is_not_served())
    }

    /// Short classification used in logs and batch summaries.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Dispatch(DispatchError::NotServed { .. }) => "not_served",
            Self::Dispatch(DispatchError::RouteUnresolvable { .. }) => "route_unresolvable",
            Self::Dispatch(DispatchError::Directory(_)) => "directory",
            Self::Pricing(_) => "pricing_unavailable",
            Self::MissingSnapshot { .. } => "missing_snapshot",
            Self::CalculationFault { .. } => "calculation_fault",
        }
    }
}

// ============================================================================
// Application
// ============================================================================

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The dispatcher directory failed.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Pricing fetch or normalization failed.
    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is a validation error, including invalid
    /// requests rejected by the domain.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Domain(e) => e.is_validation_error(),
            _ => false,
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if pricing could not be loaded.
    #[must_use]
    pub fn is_pricing_unavailable(&self) -> bool {
        matches!(self, Self::Pricing(_))
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Pricing(e) => e.is_retryable(),
            Self::Directory(e) => e.is_unavailable(),
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
