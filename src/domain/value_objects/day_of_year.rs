//! # Day-of-Year Keys
//!
//! The pricing feed publishes rates keyed by calendar day without a year
//! (`"MM-DD"`), and restricted dates as single days or inclusive ranges
//! (`"MM-DD..MM-DD"`). A range whose end precedes its start wraps across the
//! year boundary, e.g. `"12-24..01-02"`.
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::value_objects::day_of_year::{DayOfYear, DayRange};
//!
//! let canada_day: DayOfYear = "07-01".parse().unwrap();
//! assert_eq!(canada_day.to_string(), "07-01");
//!
//! let holidays: DayRange = "12-24..01-02".parse().unwrap();
//! assert!(holidays.contains("12-31".parse().unwrap()));
//! assert!(holidays.contains("01-01".parse().unwrap()));
//! assert!(!holidays.contains("01-03".parse().unwrap()));
//! ```

use crate::domain::errors::DomainError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Days per month, February counted as leap.
const DAYS_IN_MONTH: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A calendar day independent of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOfYear {
    month: u8,
    day: u8,
}

impl DayOfYear {
    /// Creates a day-of-year key.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDayKey` if the month/day combination
    /// does not exist in a leap year.
    pub fn new(month: u8, day: u8) -> Result<Self, DomainError> {
        let max_day = month
            .checked_sub(1)
            .and_then(|idx| DAYS_IN_MONTH.get(usize::from(idx)))
            .copied()
            .ok_or_else(|| DomainError::invalid_day_key(format!("{month:02}-{day:02}")))?;
        if day == 0 || day > max_day {
            return Err(DomainError::invalid_day_key(format!("{month:02}-{day:02}")));
        }
        Ok(Self { month, day })
    }

    /// Returns the key of a concrete date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        // chrono guarantees month in 1..=12 and day in 1..=31.
        Self {
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }

    /// Month, 1-based.
    #[inline]
    #[must_use]
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Day of month, 1-based.
    #[inline]
    #[must_use]
    pub fn day(&self) -> u8 {
        self.day
    }
}

impl fmt::Display for DayOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for DayOfYear {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (month, day) = trimmed
            .split_once('-')
            .ok_or_else(|| DomainError::invalid_day_key(trimmed))?;
        let month: u8 = month
            .parse()
            .map_err(|_| DomainError::invalid_day_key(trimmed))?;
        let day: u8 = day
            .parse()
            .map_err(|_| DomainError::invalid_day_key(trimmed))?;
        Self::new(month, day)
    }
}

impl Serialize for DayOfYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayOfYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An inclusive span of days, possibly wrapping the year end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayRange {
    start: DayOfYear,
    end: DayOfYear,
}

impl DayRange {
    /// Creates a range from `start` to `end`, inclusive.
    #[must_use]
    pub fn new(start: DayOfYear, end: DayOfYear) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one day.
    #[must_use]
    pub fn single(day: DayOfYear) -> Self {
        Self::new(day, day)
    }

    /// First day of the range.
    #[inline]
    #[must_use]
    pub fn start(&self) -> DayOfYear {
        self.start
    }

    /// Last day of the range.
    #[inline]
    #[must_use]
    pub fn end(&self) -> DayOfYear {
        self.end
    }

    /// Returns true if `day` falls inside the range.
    #[must_use]
    pub fn contains(&self, day: DayOfYear) -> bool {
        if self.start <= self.end {
            self.start <= day && day <= self.end
        } else {
            day >= self.start || day <= self.end
        }
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

impl FromStr for DayRange {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("..") {
            Some((start, end)) => Ok(Self::new(start.parse()?, end.parse()?)),
            None => Ok(Self::single(s.parse()?)),
        }
    }
}

impl Serialize for DayRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
