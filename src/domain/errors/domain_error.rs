//! # Domain Errors
//!
//! Typed domain error definitions with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Validation errors
//! - **2000-2999**: Pricing data errors
//! - **3000-3999**: Calculation errors
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::errors::DomainError;
//!
//! let error = DomainError::invalid_day_key("13-01");
//! assert_eq!(error.code(), 1003);
//! assert!(error.is_validation_error());
//! ```

use thiserror::Error;

/// Domain-level error with numeric error codes.
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Validation errors |
/// | 2000-2999 | Pricing data errors |
/// | 3000-3999 | Calculation errors |
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Quote request failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Coordinate out of range.
    #[error("invalid coordinate: ({lat}, {lng})")]
    InvalidCoordinate {
        /// Latitude supplied.
        lat: f64,
        /// Longitude supplied.
        lng: f64,
    },

    /// Day key is not a valid `MM-DD`.
    #[error("invalid day key: '{0}'")]
    InvalidDayKey(String),

    /// Service area definition is inconsistent.
    #[error("invalid service area: {0}")]
    InvalidServiceArea(String),

    // ========================================================================
    // Pricing Data Errors (2000-2999)
    // ========================================================================
    /// Pricing record could not be normalized into a snapshot.
    #[error("pricing normalization failed: {0}")]
    Normalization(String),

    /// A rate value is missing or not positive.
    #[error("invalid rate: {0}")]
    InvalidRate(String),

    // ========================================================================
    // Calculation Errors (3000-3999)
    // ========================================================================
    /// A strategy received inputs it cannot price.
    #[error("calculation fault: {0}")]
    CalculationFault(String),

    /// Decimal arithmetic overflowed.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates an invalid coordinate error.
    #[must_use]
    pub fn invalid_coordinate(lat: f64, lng: f64) -> Self {
        Self::InvalidCoordinate { lat, lng }
    }

    /// Creates an invalid day key error.
    #[must_use]
    pub fn invalid_day_key(key: impl Into<String>) -> Self {
        Self::InvalidDayKey(key.into())
    }

    /// Creates an invalid service area error.
    #[must_use]
    pub fn invalid_service_area(message: impl Into<String>) -> Self {
        Self::InvalidServiceArea(message.into())
    }

    /// Creates a normalization error.
    #[must_use]
    pub fn normalization(message: impl Into<String>) -> Self {
        Self::Normalization(message.into())
    }

    /// Creates an invalid rate error.
    #[must_use]
    pub fn invalid_rate(message: impl Into<String>) -> Self {
        Self::InvalidRate(message.into())
    }

    /// Creates a calculation fault.
    #[must_use]
    pub fn calculation_fault(message: impl Into<String>) -> Self {
        Self::CalculationFault(message.into())
    }

    /// Returns the numeric error code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidCoordinate { .. } => 1002,
            Self::InvalidDayKey(_) => 1003,
            Self::InvalidServiceArea(_) => 1004,

            Self::Normalization(_) => 2001,
            Self::InvalidRate(_) => 2002,

            Self::CalculationFault(_) => 3001,
            Self::Overflow => 3002,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "pricing",
            3000..=3999 => "calculation",
            _ => "unknown",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if this is a calculation error.
    #[inline]
    #[must_use]
    pub const fn is_calculation_error(&self) -> bool {
        matches!(self.code(), 3000..=3999)
    }
}
