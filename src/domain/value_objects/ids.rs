//! # Identity Value Objects
//!
//! Type-safe identity wrappers for domain identifiers.
//!
//! - [`RequestId`] - UUID identifying one quote-generation call
//! - [`LocationId`] - Numeric dispatcher location identifier (ordering breaks
//!   selection ties)
//! - [`LocationKey`] - Name under which a location's pricing is published by
//!   the external feed and cached

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Quote request identifier.
///
/// # Examples
///
/// ```
/// use move_quote::domain::value_objects::ids::RequestId;
///
/// let a = RequestId::new_v4();
/// let b = RequestId::new_v4();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a request ID from an existing UUID.
    #[inline]
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a new random request ID using UUID v4.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for RequestId {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Dispatcher location identifier.
///
/// Ordered so that ties between equidistant dispatchers resolve to the
/// lowest id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(u32);

impl LocationId {
    /// Creates a location ID.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loc-{}", self.0)
    }
}

impl From<u32> for LocationId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Pricing location key.
///
/// Keys are trimmed on construction; comparison is exact.
///
/// # Examples
///
/// ```
/// use move_quote::domain::value_objects::ids::LocationKey;
///
/// let key = LocationKey::new("  Toronto ");
/// assert_eq!(key.as_str(), "Toronto");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationKey(String);

impl LocationKey {
    /// Creates a new location key.
    #[must_use]
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().trim().to_string())
    }

    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the key is empty after trimming.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationKey {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LocationKey {
    #[inline]
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for LocationKey {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn request_id_display_is_hyphenated() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = RequestId::new(uuid);
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(id.get(), uuid);
    }

    #[test]
    fn location_ids_order_numerically() {
        let mut ids = vec![LocationId::new(12), LocationId::new(3), LocationId::new(7)];
        ids.sort();
        assert_eq!(ids, vec![LocationId::new(3), LocationId::new(7), LocationId::new(12)]);
        assert_eq!(LocationId::new(3).to_string(), "loc-3");
    }

    #[test]
    fn location_key_is_trimmed() {
        assert_eq!(LocationKey::new(" Toronto\t"), LocationKey::from("Toronto"));
        assert!(LocationKey::new("   ").is_empty());
    }

    #[test]
    fn location_key_serializes_transparently() {
        let json = serde_json::to_string(&LocationKey::new("Vaughan")).unwrap();
        assert_eq!(json, "\"Vaughan\"");
    }
}
