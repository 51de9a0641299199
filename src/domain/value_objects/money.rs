//! # Money and Hours
//!
//! Decimal helpers shared by every pricing strategy.
//!
//! Amounts are carried as [`Decimal`] and rounded to cents with
//! midpoint-away-from-zero. Route data arrives as `f64`; it is converted once
//! at the boundary with [`decimal_from_f64`].
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::value_objects::money::{round_money, decimal_from_f64};
//! use rust_decimal::Decimal;
//!
//! assert_eq!(round_money(Decimal::new(10_005, 3)), Decimal::new(1_001, 2));
//! assert_eq!(decimal_from_f64(1.5).unwrap(), Decimal::new(15, 1));
//! assert!(decimal_from_f64(f64::NAN).is_none());
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on money amounts.
pub const MONEY_SCALE: u32 = 2;

/// Decimal places kept on hour figures.
pub const HOURS_SCALE: u32 = 2;

/// Rounds an amount to cents.
#[inline]
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an hour figure to two decimals.
#[inline]
#[must_use]
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(HOURS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a finite `f64` into a [`Decimal`].
///
/// Returns `None` for NaN, infinities and values outside the decimal range.
#[must_use]
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Converts a [`Decimal`] into `f64`, falling back to zero.
#[inline]
#[must_use]
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
