//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! This module provides the closed sets the quote engine reasons about:
//!
//! - [`VendorId`] - The moving companies the engine quotes for
//! - [`HeavyItem`] - Items that carry a surcharge and may upgrade the crew
//! - [`AdditionalService`] - Optional services billed at a flat price
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a quoting vendor.
///
/// Each variant is backed by exactly one pricing strategy.
///
/// # Examples
///
/// ```
/// use move_quote::domain::value_objects::enums::VendorId;
///
/// let vendor: VendorId = "northline".parse().unwrap();
/// assert_eq!(vendor, VendorId::Northline);
/// assert!(!vendor.uses_dynamic_pricing());
/// assert!(VendorId::MetroMovers.uses_dynamic_pricing());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorId {
    /// Metro Movers: day-by-day rates from the external pricing feed.
    MetroMovers,
    /// Northline Moving: static rate card with a fuel surcharge.
    Northline,
    /// Easy Haul: static rate card with weight-based crew sizing.
    EasyHaul,
    /// Velocity Relocation: long-distance carrier with linehaul pricing.
    Velocity,
}

impl VendorId {
    /// Every vendor, in stable order.
    pub const ALL: [VendorId; 4] = [
        Self::MetroMovers,
        Self::Northline,
        Self::EasyHaul,
        Self::Velocity,
    ];

    /// Returns the wire identifier of the vendor.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MetroMovers => "metro_movers",
            Self::Northline => "northline",
            Self::EasyHaul => "easy_haul",
            Self::Velocity => "velocity",
        }
    }

    /// Returns the customer-facing vendor name.
    #[inline]
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::MetroMovers => "Metro Movers",
            Self::Northline => "Northline Moving",
            Self::EasyHaul => "Easy Haul",
            Self::Velocity => "Velocity Relocation",
        }
    }

    /// Returns true if this vendor prices from the cached pricing feed.
    #[inline]
    #[must_use]
    pub const fn uses_dynamic_pricing(self) -> bool {
        matches!(self, Self::MetroMovers)
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorId {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "metro_movers" | "metro" => Ok(Self::MetroMovers),
            "northline" | "northline_moving" => Ok(Self::Northline),
            "easy_haul" | "easyhaul" => Ok(Self::EasyHaul),
            "velocity" | "velocity_relocation" => Ok(Self::Velocity),
            _ => Err(ParseEnumError::InvalidValue("VendorId", s.to_string())),
        }
    }
}

/// Heavy or awkward items priced per unit.
///
/// # Examples
///
/// ```
/// use move_quote::domain::value_objects::enums::HeavyItem;
///
/// assert!(HeavyItem::Piano.upgrades_crew());
/// assert!(!HeavyItem::Treadmill.upgrades_crew());
/// assert_eq!("pool table".parse::<HeavyItem>().unwrap(), HeavyItem::PoolTable);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeavyItem {
    /// Upright or grand piano.
    Piano,
    /// Gun safe or document safe.
    Safe,
    /// Slate pool table.
    PoolTable,
    /// Portable hot tub.
    HotTub,
    /// Treadmill or similar exercise machine.
    Treadmill,
    /// Any other oversized item.
    Other,
}

impl HeavyItem {
    /// Returns true if the item needs an extra mover regardless of home size.
    #[inline]
    #[must_use]
    pub const fn upgrades_crew(self) -> bool {
        matches!(
            self,
            Self::Piano | Self::Safe | Self::PoolTable | Self::HotTub
        )
    }
}

impl fmt::Display for HeavyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Piano => "piano",
            Self::Safe => "safe",
            Self::PoolTable => "pool_table",
            Self::HotTub => "hot_tub",
            Self::Treadmill => "treadmill",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

impl FromStr for HeavyItem {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "piano" => Ok(Self::Piano),
            "safe" => Ok(Self::Safe),
            "pool_table" | "pooltable" => Ok(Self::PoolTable),
            "hot_tub" | "hottub" => Ok(Self::HotTub),
            "treadmill" => Ok(Self::Treadmill),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError::InvalidValue("HeavyItem", s.to_string())),
        }
    }
}

/// Optional services offered on top of the move itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdditionalService {
    /// Full packing of the household.
    Packing,
    /// Short-term storage between pickup and dropoff.
    Storage,
    /// Move-out cleaning.
    Cleaning,
    /// Junk removal and disposal.
    JunkRemoval,
    /// Furniture disassembly and reassembly.
    Disassembly,
}

impl fmt::Display for AdditionalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Packing => "packing",
            Self::Storage => "storage",
            Self::Cleaning => "cleaning",
            Self::JunkRemoval => "junk_removal",
            Self::Disassembly => "disassembly",
        };
        f.write_str(name)
    }
}

impl FromStr for AdditionalService {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "packing" => Ok(Self::Packing),
            "storage" => Ok(Self::Storage),
            "cleaning" => Ok(Self::Cleaning),
            "junk_removal" | "junk" => Ok(Self::JunkRemoval),
            "disassembly" | "assembly" => Ok(Self::Disassembly),
            _ => Err(ParseEnumError::InvalidValue(
                "AdditionalService",
                s.to_string(),
            )),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod vendor_id {
        use super::*;

        #[test]
        fn display_matches_wire_name() {
            for vendor in VendorId::ALL {
                assert_eq!(vendor.to_string(), vendor.as_str());
                assert_eq!(vendor.as_str().parse::<VendorId>().unwrap(), vendor);
            }
        }

        #[test]
        fn from_str_accepts_aliases() {
            assert_eq!(
                "Metro-Movers".parse::<VendorId>().unwrap(),
                VendorId::MetroMovers
            );
            assert_eq!(
                "Velocity Relocation".parse::<VendorId>().unwrap(),
                VendorId::Velocity
            );
        }

        #[test]
        fn from_str_invalid() {
            let err = "acme".parse::<VendorId>().unwrap_err();
            assert_eq!(err.to_string(), "invalid VendorId value: 'acme'");
        }

        #[test]
        fn only_metro_is_dynamic() {
            let dynamic: Vec<_> = VendorId::ALL
                .into_iter()
                .filter(|v| v.uses_dynamic_pricing())
                .collect();
            assert_eq!(dynamic, vec![VendorId::MetroMovers]);
        }

        #[test]
        fn serde_uses_snake_case() {
            let json = serde_json::to_string(&VendorId::EasyHaul).unwrap();
            assert_eq!(json, "\"easy_haul\"");
        }
    }

    mod heavy_item {
        use super::*;

        #[test]
        fn crew_upgrading_items() {
            assert!(HeavyItem::Piano.upgrades_crew());
            assert!(HeavyItem::Safe.upgrades_crew());
            assert!(HeavyItem::PoolTable.upgrades_crew());
            assert!(HeavyItem::HotTub.upgrades_crew());
            assert!(!HeavyItem::Treadmill.upgrades_crew());
            assert!(!HeavyItem::Other.upgrades_crew());
        }

        #[test]
        fn from_str_normalizes_separators() {
            assert_eq!("Hot-Tub".parse::<HeavyItem>().unwrap(), HeavyItem::HotTub);
            assert!("sofa".parse::<HeavyItem>().is_err());
        }
    }

    mod additional_service {
        use super::*;

        #[test]
        fn from_str_accepts_short_names() {
            assert_eq!(
                "junk".parse::<AdditionalService>().unwrap(),
                AdditionalService::JunkRemoval
            );
            assert_eq!(
                AdditionalService::JunkRemoval.to_string(),
                "junk_removal"
            );
        }
    }
}
