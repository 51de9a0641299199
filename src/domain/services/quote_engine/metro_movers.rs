//! Metro Movers: dynamic pricing from the external feed.
//!
//! The base rate for the move date comes from the dispatcher's pricing
//! snapshot (restriction, day rate, then fallback). Crew rates, crew and
//! truck overrides and the minimum charge all come from the same snapshot.
//! A 10% markup is applied on the subtotal.

use super::rules::{self, PriceList, Staffing, dollars};
use super::{QuoteContext, TravelLimits, VendorQuoteEngine};
use crate::domain::entities::{CostBreakdown, QuoteResult, RateResolution, RejectionReason};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::VendorId;
use rust_decimal::Decimal;
use tracing::debug;

const PRICES: PriceList = PriceList {
    piano: dollars(250),
    safe: dollars(200),
    pool_table: dollars(300),
    hot_tub: dollars(400),
    treadmill: dollars(75),
    other: dollars(50),
    packing: dollars(300),
    storage: dollars(200),
    cleaning: dollars(250),
    junk_removal: dollars(150),
    disassembly: dollars(100),
};

const TRUCK_FEE: Decimal = dollars(100);
const MARKUP_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
const ONE_LEG_FACTOR: f64 = 2.5;

/// Metro Movers pricing strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetroMoversEngine;

impl VendorQuoteEngine for MetroMoversEngine {
    fn vendor(&self) -> VendorId {
        VendorId::MetroMovers
    }

    fn limits(&self) -> TravelLimits {
        TravelLimits {
            max_route_km: None,
            max_one_way_hours: Some(10.0),
        }
    }

    fn calculate(&self, ctx: &QuoteContext<'_>) -> DomainResult<QuoteResult> {
        if let Some((reason, message)) = self.limits().violation(ctx.travel) {
            return Ok(ctx.reject(reason, message));
        }

        let snapshot = ctx.snapshot.ok_or_else(|| {
            DomainError::calculation_fault(format!(
                "no pricing snapshot for {}",
                ctx.dispatcher.pricing_key()
            ))
        })?;

        let base_rate = match snapshot.resolve_base_rate(ctx.request.move_date) {
            RateResolution::Blackout => {
                return Ok(ctx.reject(
                    RejectionReason::DateUnavailable,
                    format!("{} is blacked out", ctx.request.move_date),
                ));
            }
            RateResolution::Unavailable => {
                return Ok(ctx.reject(
                    RejectionReason::NoPricingData,
                    format!("no rate published for {}", ctx.request.move_date),
                ));
            }
            resolved => resolved.rate().unwrap_or_default(),
        };

        let notes = snapshot.notes();
        let max_crew = notes.crew_limit.map_or(rules::MAX_CREW, |limit| limit.min(rules::MAX_CREW));
        let crew = rules::finalize_crew(
            rules::crew_for_rooms(ctx.request.rooms),
            ctx.request,
            max_crew,
        );
        let trucks = notes
            .truck_count
            .filter(|count| *count > 0)
            .unwrap_or_else(|| rules::trucks_for_crew(crew));

        let staffing = Staffing {
            crew,
            trucks,
            billable_hours: rules::billable_hours(ctx.request, crew),
            travel_hours: rules::truck_travel_hours(ctx.travel, ONE_LEG_FACTOR)?,
            hourly_rate: snapshot.hourly_rate(crew, trucks, base_rate),
        };

        let mut breakdown = CostBreakdown {
            labor: staffing.billable_hours * staffing.hourly_rate,
            travel: staffing.travel_hours * staffing.hourly_rate,
            truck_fee: TRUCK_FEE * Decimal::from(trucks),
            heavy_items: PRICES.heavy_items_cost(ctx.request),
            additional_services: PRICES.services_cost(ctx.request),
            markup: Decimal::ZERO,
        };

        if let Some(min_charge) = notes.min_charge {
            let shortfall = min_charge - breakdown.subtotal();
            if shortfall > Decimal::ZERO {
                debug!(%min_charge, %shortfall, "raising labor to minimum charge");
                breakdown.labor += shortfall;
            }
        }
        breakdown.markup = breakdown.subtotal() * MARKUP_RATE;

        Ok(rules::priced_result(ctx, staffing, breakdown))
    }
}
