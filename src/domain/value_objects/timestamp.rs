//! # Timestamp Value Object
//!
//! Wall-clock UTC timestamp used for reporting when quotes were generated
//! and when pricing snapshots were fetched.
//!
//! Cache validity is judged on the monotonic clock; this type only carries
//! the human-readable moment alongside it.
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::value_objects::timestamp::Timestamp;
//!
//! let fetched = Timestamp::from_secs(1_700_000_000).unwrap();
//! assert_eq!(fetched.to_string(), "2023-11-14T22:13:20+00:00");
//! assert!(Timestamp::now() > fetched);
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>`; always in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn now_is_current() {
        let before = Utc::now();
        let ts = Timestamp::now();
        assert!(ts.0 >= before);
        assert!(ts.0 <= Utc::now());
    }

    #[test]
    fn displays_as_rfc3339() {
        let ts = Timestamp::from_secs(1_704_067_200).unwrap();
        assert_eq!(ts.to_string(), "2024-01-01T00:00:00+00:00");
        assert!(Timestamp::from_secs(i64::MAX).is_none());
    }

    #[test]
    fn orders_chronologically() {
        let earlier = Timestamp::from_secs(1_000).unwrap();
        let later = Timestamp::from(Utc.timestamp_opt(1_050, 0).unwrap());
        assert!(later > earlier);
    }

    #[test]
    fn serde_is_transparent() {
        let ts = Timestamp::from_secs(0).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("1970-01-01"));
        assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), ts);
    }
}
