//! # Quote Result
//!
//! A vendor's answer to a quote request: either an itemised price or a
//! rejection with a reason.
//!
//! # Examples
//!
//! ```
//! use move_quote::domain::entities::quote_result::CostBreakdown;
//! use rust_decimal::Decimal;
//!
//! let breakdown = CostBreakdown {
//!     labor: Decimal::new(71_600, 2),
//!     travel: Decimal::new(21_480, 2),
//!     truck_fee: Decimal::new(10_000, 2),
//!     ..CostBreakdown::default()
//! };
//! assert_eq!(breakdown.total(), Decimal::new(103_080, 2));
//! ```

use crate::domain::value_objects::money::round_money;
use crate::domain::value_objects::{LocationId, RequestId, Timestamp, VendorId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Itemised cost of a move.
///
/// Each component is rounded to cents; the total is their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Billable labor.
    pub labor: Decimal,
    /// Truck travel time or linehaul.
    pub travel: Decimal,
    /// Truck fees or fuel surcharge.
    pub truck_fee: Decimal,
    /// Heavy item surcharges.
    pub heavy_items: Decimal,
    /// Additional services.
    pub additional_services: Decimal,
    /// Markup on the subtotal.
    pub markup: Decimal,
}

impl CostBreakdown {
    /// Sum of all components.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.labor
            + self.travel
            + self.truck_fee
            + self.heavy_items
            + self.additional_services
            + self.markup
    }

    /// Sum of all components except markup.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.total() - self.markup
    }

    /// Returns the breakdown with every component rounded to cents.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            labor: round_money(self.labor),
            travel: round_money(self.travel),
            truck_fee: round_money(self.truck_fee),
            heavy_items: round_money(self.heavy_items),
            additional_services: round_money(self.additional_services),
            markup: round_money(self.markup),
        }
    }
}

/// Why a vendor declined to quote.
///
/// Vendors with no dispatcher serving the origin are left out of a batch
/// entirely, so there is no service-area reason here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Route distance exceeds the vendor's ceiling.
    DistanceLimitExceeded,
    /// One-way travel time exceeds the vendor's ceiling.
    TravelTimeLimitExceeded,
    /// The move date is blacked out.
    DateUnavailable,
    /// No rate is published for the move date.
    NoPricingData,
}

impl RejectionReason {
    /// Returns true for ceiling violations (distance or time).
    #[inline]
    #[must_use]
    pub const fn is_limit_exceeded(self) -> bool {
        matches!(
            self,
            Self::DistanceLimitExceeded | Self::TravelTimeLimitExceeded
        )
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::DistanceLimitExceeded => "distance limit exceeded",
            Self::TravelTimeLimitExceeded => "travel time limit exceeded",
            Self::DateUnavailable => "date unavailable",
            Self::NoPricingData => "no pricing data",
        };
        f.write_str(text)
    }
}

/// A priced quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedQuote {
    /// Movers assigned.
    pub crew_size: u8,
    /// Trucks assigned.
    pub truck_count: u8,
    /// Labor hours charged (never below the minimum).
    pub billable_hours: Decimal,
    /// Truck travel hours.
    pub travel_hours: Decimal,
    /// Hourly rate for the crew.
    pub hourly_rate: Decimal,
    /// Itemised cost.
    pub breakdown: CostBreakdown,
    /// Total price.
    pub total_cost: Decimal,
}

/// Priced or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteOutcome {
    /// The vendor priced the move.
    Quoted(PricedQuote),
    /// The vendor declined.
    Rejected {
        /// Reason code.
        reason: RejectionReason,
        /// Human-readable detail.
        message: String,
    },
}

/// One vendor's result for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    request_id: RequestId,
    vendor: VendorId,
    vendor_name: String,
    dispatcher_id: LocationId,
    dispatcher_name: String,
    #[serde(flatten)]
    outcome: QuoteOutcome,
    generated_at: Timestamp,
}

impl QuoteResult {
    /// Creates a priced result.
    #[must_use]
    pub fn quoted(
        request_id: RequestId,
        vendor: VendorId,
        dispatcher_id: LocationId,
        dispatcher_name: impl Into<String>,
        quote: PricedQuote,
    ) -> Self {
        Self::with_outcome(
            request_id,
            vendor,
            dispatcher_id,
            dispatcher_name,
            QuoteOutcome::Quoted(quote),
        )
    }

    /// Creates a rejection.
    #[must_use]
    pub fn rejected(
        request_id: RequestId,
        vendor: VendorId,
        dispatcher_id: LocationId,
        dispatcher_name: impl Into<String>,
        reason: RejectionReason,
        message: impl Into<String>,
    ) -> Self {
        Self::with_outcome(
            request_id,
            vendor,
            dispatcher_id,
            dispatcher_name,
            QuoteOutcome::Rejected {
                reason,
                message: message.into(),
            },
        )
    }

    fn with_outcome(
        request_id: RequestId,
        vendor: VendorId,
        dispatcher_id: LocationId,
        dispatcher_name: impl Into<String>,
        outcome: QuoteOutcome,
    ) -> Self {
        Self {
            request_id,
            vendor,
            vendor_name: vendor.display_name().to_string(),
            dispatcher_id,
            dispatcher_name: dispatcher_name.into(),
            outcome,
            generated_at: Timestamp::now(),
        }
    }

    /// Request this result answers.
    #[inline]
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Vendor that produced the result.
    #[inline]
    #[must_use]
    pub fn vendor(&self) -> VendorId {
        self.vendor
    }

    /// Dispatcher used.
    #[inline]
    #[must_use]
    pub fn dispatcher_id(&self) -> LocationId {
        self.dispatcher_id
    }

    /// Dispatcher display name.
    #[inline]
    #[must_use]
    pub fn dispatcher_name(&self) -> &str {
        &self.dispatcher_name
    }

    /// Priced or rejected outcome.
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> &QuoteOutcome {
        &self.outcome
    }

    /// Price details when quoted.
    #[must_use]
    pub fn priced(&self) -> Option<&PricedQuote> {
        match &self.outcome {
            QuoteOutcome::Quoted(quote) => Some(quote),
            QuoteOutcome::Rejected { .. } => None,
        }
    }

    /// Rejection reason when rejected.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match &self.outcome {
            QuoteOutcome::Quoted(_) => None,
            QuoteOutcome::Rejected { reason, .. } => Some(*reason),
        }
    }

    /// Returns true if the vendor priced the move.
    #[inline]
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        matches!(self.outcome, QuoteOutcome::Quoted(_))
    }

    /// Total cost when quoted.
    #[must_use]
    pub fn total_cost(&self) -> Option<Decimal> {
        self.priced().map(|q| q.total_cost)
    }

    /// Crew size when quoted.
    #[must_use]
    pub fn crew_size(&self) -> Option<u8> {
        self.priced().map(|q| q.crew_size)
    }

    /// When the result was produced.
    #[inline]
    #[must_use]
    pub fn generated_at(&self) -> Timestamp {
        self.generated_at
    }
}

impl fmt::Display for QuoteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            QuoteOutcome::Quoted(quote) => write!(
                f,
                "{} via {}: ${} ({} movers, {} trucks)",
                self.vendor_name,
                self.dispatcher_name,
                quote.total_cost,
                quote.crew_size,
                quote.truck_count
            ),
            QuoteOutcome::Rejected { reason, .. } => {
                write!(f, "{} rejected: {}", self.vendor_name, reason)
            }
        }
    }
}
