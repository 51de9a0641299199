//! # Pricing Snapshot
//!
//! Normalized, immutable pricing for one serving location.
//!
//! The external feed publishes a [`PricingFeedRecord`] per location; it is
//! normalized once into a [`PricingSnapshot`] and never mutated afterwards. A
//! refresh always builds a new snapshot.
//!
//! Normalization never invents numbers. When the record carries no day
//! rates the snapshot's day map is empty and callers fall back to the
//! snapshot's own fallback rate; when the record carries no fallback either,
//! the snapshot has none and pricing reports the data as missing.
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::entities::pricing_snapshot::{PricingFeedRecord, PricingSnapshot, RateResolution};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let record: PricingFeedRecord = serde_json::from_value(serde_json::json!({
//!     "location_name": "Toronto",
//!     "day_rates": {},
//!     "crew_rate_table": [{ "crew_size": 2, "rate": "149" }]
//! }))
//! .unwrap();
//!
//! let snapshot = PricingSnapshot::from_record(record).unwrap();
//! assert!(snapshot.day_rates().is_empty());
//!
//! let date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
//! assert_eq!(
//!     snapshot.resolve_base_rate(date),
//!     RateResolution::Fallback(Decimal::new(149, 0))
//! );
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{DayOfYear, DayRange, LocationKey};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

// ============================================================================
// Feed Record (normalization input)
// ============================================================================

/// One row of the crew rate table as published by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRateRecord {
    /// Number of movers.
    pub crew_size: u8,
    /// Truck count the rate applies to, if the feed splits by trucks.
    #[serde(default)]
    pub trucks: Option<u8>,
    /// Hourly rate.
    pub rate: Decimal,
}

/// Kind of a restricted date as published by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    /// No moves booked on these days.
    Blackout,
    /// A fixed base rate replaces the day rate.
    FixedRate,
}

/// A restricted date or range as published by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedDateRecord {
    /// `"MM-DD"` or `"MM-DD..MM-DD"`.
    pub dates: String,
    /// Restriction kind.
    pub kind: RestrictionKind,
    /// Fixed rate, required for [`RestrictionKind::FixedRate`].
    #[serde(default)]
    pub rate: Option<Decimal>,
}

/// Operational notes attached to a location's pricing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingNotes {
    /// Minimum pre-markup charge for any move.
    #[serde(default)]
    pub min_charge: Option<Decimal>,
    /// Largest crew the location can field.
    #[serde(default)]
    pub crew_limit: Option<u8>,
    /// Trucks the location always sends.
    #[serde(default)]
    pub truck_count: Option<u8>,
    /// Free text.
    #[serde(default)]
    pub text: Option<String>,
}

/// Normalized feed output for one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingFeedRecord {
    /// Location the record belongs to.
    pub location_name: String,
    /// Sparse `"MM-DD"` → base rate map.
    #[serde(default)]
    pub day_rates: BTreeMap<String, Decimal>,
    /// Hourly rates by crew size, optionally split by trucks.
    #[serde(default)]
    pub crew_rate_table: Vec<CrewRateRecord>,
    /// Explicit fallback base rate.
    #[serde(default)]
    pub default_rate: Option<Decimal>,
    /// Blackout and fixed-rate days.
    #[serde(default)]
    pub restricted_dates: Vec<RestrictedDateRecord>,
    /// Operational notes.
    #[serde(default)]
    pub notes: PricingNotes,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Hourly rate for a crew size, optionally specific to a truck count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrewRate {
    /// Number of movers.
    pub crew_size: u8,
    /// Truck count, `None` when the rate applies to any.
    pub trucks: Option<u8>,
    /// Hourly rate.
    pub rate: Decimal,
}

/// What a restricted day does to pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rate", rename_all = "snake_case")]
pub enum Restriction {
    /// Day is not bookable.
    Blackout,
    /// Base rate is fixed at the given amount.
    FixedRate(Decimal),
}

/// A restriction applied to a span of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRestriction {
    /// Days covered.
    pub days: DayRange,
    /// Effect on pricing.
    pub restriction: Restriction,
}

/// Outcome of resolving a base rate for a move date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateResolution {
    /// The day is blacked out.
    Blackout,
    /// A fixed rate from a restricted date applies.
    Fixed(Decimal),
    /// A day-specific rate applies.
    Day(Decimal),
    /// No day rate; the snapshot's fallback rate applies.
    Fallback(Decimal),
    /// No day rate and no fallback published.
    Unavailable,
}

impl RateResolution {
    /// The resolved rate, if any.
    #[must_use]
    pub fn rate(&self) -> Option<Decimal> {
        match self {
            Self::Fixed(rate) | Self::Day(rate) | Self::Fallback(rate) => Some(*rate),
            Self::Blackout | Self::Unavailable => None,
        }
    }
}

/// Normalized pricing for one location.
///
/// # Invariants
///
/// - Every stored rate is positive
/// - Never mutated after construction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingSnapshot {
    location: LocationKey,
    day_rates: BTreeMap<DayOfYear, Decimal>,
    crew_rates: Vec<CrewRate>,
    fallback_rate: Option<Decimal>,
    restrictions: Vec<DateRestriction>,
    notes: PricingNotes,
    skipped_entries: usize,
}

impl PricingSnapshot {
    /// Normalizes a feed record into a snapshot.
    ///
    /// Malformed day keys, non-positive rates and unusable restrictions are
    /// skipped with a warning and counted in
    /// [`skipped_entries`](Self::skipped_entries).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Normalization` if the record has no location
    /// name.
    pub fn from_record(record: PricingFeedRecord) -> DomainResult<Self> {
        let location = LocationKey::new(&record.location_name);
        if location.is_empty() {
            return Err(DomainError::normalization("record has no location name"));
        }

        let mut skipped = 0usize;

        let mut day_rates = BTreeMap::new();
        for (key, rate) in record.day_rates {
            match key.parse::<DayOfYear>() {
                Ok(day) if rate > Decimal::ZERO => {
                    day_rates.insert(day, rate);
                }
                Ok(_) => {
                    warn!(location = %location, day = %key, %rate, "skipping non-positive day rate");
                    skipped += 1;
                }
                Err(error) => {
                    warn!(location = %location, day = %key, %error, "skipping malformed day rate");
                    skipped += 1;
                }
            }
        }

        let mut crew_rates: Vec<CrewRate> = Vec::with_capacity(record.crew_rate_table.len());
        for entry in record.crew_rate_table {
            if entry.crew_size == 0 || entry.rate <= Decimal::ZERO {
                warn!(location = %location, crew = entry.crew_size, rate = %entry.rate, "skipping invalid crew rate");
                skipped += 1;
                continue;
            }
            crew_rates.retain(|r| !(r.crew_size == entry.crew_size && r.trucks == entry.trucks));
            crew_rates.push(CrewRate {
                crew_size: entry.crew_size,
                trucks: entry.trucks,
                rate: entry.rate,
            });
        }
        crew_rates.sort_by_key(|r| (r.crew_size, r.trucks));

        let mut restrictions = Vec::with_capacity(record.restricted_dates.len());
        for entry in record.restricted_dates {
            let days = match entry.dates.parse::<DayRange>() {
                Ok(days) => days,
                Err(error) => {
                    warn!(location = %location, dates = %entry.dates, %error, "skipping malformed restricted date");
                    skipped += 1;
                    continue;
                }
            };
            let restriction = match (entry.kind, entry.rate) {
                (RestrictionKind::Blackout, _) => Restriction::Blackout,
                (RestrictionKind::FixedRate, Some(rate)) if rate > Decimal::ZERO => {
                    Restriction::FixedRate(rate)
                }
                (RestrictionKind::FixedRate, _) => {
                    warn!(location = %location, dates = %entry.dates, "skipping fixed-rate restriction without a positive rate");
                    skipped += 1;
                    continue;
                }
            };
            restrictions.push(DateRestriction { days, restriction });
        }

        let explicit_fallback = match record.default_rate {
            Some(rate) if rate > Decimal::ZERO => Some(rate),
            Some(rate) => {
                warn!(location = %location, %rate, "ignoring non-positive default rate");
                skipped += 1;
                None
            }
            None => None,
        };
        let fallback_rate = explicit_fallback.or_else(|| {
            crew_rates
                .iter()
                .filter(|r| r.trucks.is_none())
                .min_by_key(|r| r.crew_size)
                .map(|r| r.rate)
        });

        Ok(Self {
            location,
            day_rates,
            crew_rates,
            fallback_rate,
            restrictions,
            notes: record.notes,
            skipped_entries: skipped,
        })
    }

    /// Location the snapshot belongs to.
    #[inline]
    #[must_use]
    pub fn location(&self) -> &LocationKey {
        &self.location
    }

    /// Day-specific base rates; may be empty.
    #[inline]
    #[must_use]
    pub fn day_rates(&self) -> &BTreeMap<DayOfYear, Decimal> {
        &self.day_rates
    }

    /// Crew rate table, sorted by crew size then trucks.
    #[inline]
    #[must_use]
    pub fn crew_rates(&self) -> &[CrewRate] {
        &self.crew_rates
    }

    /// Fallback base rate used when a day has no specific rate.
    #[inline]
    #[must_use]
    pub fn fallback_rate(&self) -> Option<Decimal> {
        self.fallback_rate
    }

    /// Restricted days.
    #[inline]
    #[must_use]
    pub fn restrictions(&self) -> &[DateRestriction] {
        &self.restrictions
    }

    /// Operational notes.
    #[inline]
    #[must_use]
    pub fn notes(&self) -> &PricingNotes {
        &self.notes
    }

    /// Number of feed entries dropped during normalization.
    #[inline]
    #[must_use]
    pub fn skipped_entries(&self) -> usize {
        self.skipped_entries
    }

    /// First restriction covering the day, if any.
    #[must_use]
    pub fn restriction_for(&self, day: DayOfYear) -> Option<Restriction> {
        self.restrictions
            .iter()
            .find(|r| r.days.contains(day))
            .map(|r| r.restriction)
    }

    /// Resolves the base rate for a move date.
    ///
    /// Precedence: restriction, then day rate, then fallback.
    #[must_use]
    pub fn resolve_base_rate(&self, date: NaiveDate) -> RateResolution {
        let day = DayOfYear::from_date(date);
        match self.restriction_for(day) {
            Some(Restriction::Blackout) => return RateResolution::Blackout,
            Some(Restriction::FixedRate(rate)) => return RateResolution::Fixed(rate),
            None => {}
        }
        if let Some(rate) = self.day_rates.get(&day) {
            return RateResolution::Day(*rate);
        }
        match self.fallback_rate {
            Some(rate) => RateResolution::Fallback(rate),
            None => RateResolution::Unavailable,
        }
    }

    /// Crew table entry for the crew, preferring a truck-specific row.
    #[must_use]
    pub fn crew_rate(&self, crew_size: u8, trucks: u8) -> Option<Decimal> {
        self.crew_rates
            .iter()
            .find(|r| r.crew_size == crew_size && r.trucks == Some(trucks))
            .or_else(|| {
                self.crew_rates
                    .iter()
                    .find(|r| r.crew_size == crew_size && r.trucks.is_none())
            })
            .map(|r| r.rate)
    }

    /// Hourly rate for a crew given the day's base rate.
    ///
    /// With a crew table entry the day premium (base minus fallback) is added
    /// to the entry. Without one, the base rate is treated as the two-mover
    /// price and scaled per mover.
    #[must_use]
    pub fn hourly_rate(&self, crew_size: u8, trucks: u8, base_rate: Decimal) -> Decimal {
        match self.crew_rate(crew_size, trucks) {
            Some(entry) => {
                let premium = self
                    .fallback_rate
                    .map_or(Decimal::ZERO, |fallback| base_rate - fallback);
                (entry + premium).max(Decimal::ZERO)
            }
            None => base_rate * Decimal::from(crew_size) / Decimal::TWO,
        }
    }
}
