//! Velocity Relocation: long-distance carrier.
//!
//! Local moves pay hourly truck travel like everyone else. Once the move leg
//! passes the linehaul threshold the travel component is replaced by a
//! per-km linehaul charge on the one-way distance.

use super::rules::{self, PriceList, RateCard, Staffing, cents, dollars};
use super::{QuoteContext, TravelLimits, VendorQuoteEngine};
use crate::domain::entities::{CostBreakdown, QuoteResult};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::VendorId;
use crate::domain::value_objects::money::decimal_from_f64;
use rust_decimal::Decimal;

const RATES: RateCard = RateCard::dollars(149, 199, 249, 299);

const PRICES: PriceList = PriceList {
    piano: dollars(350),
    safe: dollars(300),
    pool_table: dollars(400),
    hot_tub: dollars(500),
    treadmill: dollars(120),
    other: dollars(70),
    packing: dollars(400),
    storage: dollars(300),
    cleaning: dollars(260),
    junk_removal: dollars(200),
    disassembly: dollars(150),
};

const TRUCK_FEE: Decimal = dollars(150);
/// One-way distance above which linehaul pricing applies.
const LINEHAUL_THRESHOLD_KM: f64 = 250.0;
const LINEHAUL_PER_KM: Decimal = cents(225);
const ONE_LEG_FACTOR: f64 = 2.4;

/// Velocity Relocation pricing strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityEngine;

impl VelocityEngine {
    /// Returns true if the one-way distance is priced as linehaul.
    #[must_use]
    pub fn is_linehaul(one_way_km: f64) -> bool {
        one_way_km > LINEHAUL_THRESHOLD_KM
    }
}

impl VendorQuoteEngine for VelocityEngine {
    fn vendor(&self) -> VendorId {
        VendorId::Velocity
    }

    fn limits(&self) -> TravelLimits {
        TravelLimits {
            max_route_km: Some(5_000.0),
            max_one_way_hours: Some(60.0),
        }
    }

    fn calculate(&self, ctx: &QuoteContext<'_>) -> DomainResult<QuoteResult> {
        if let Some((reason, message)) = self.limits().violation(ctx.travel) {
            return Ok(ctx.reject(reason, message));
        }

        let crew = rules::finalize_crew(
            rules::crew_for_rooms(ctx.request.rooms),
            ctx.request,
            rules::MAX_CREW,
        );
        let staffing = Staffing {
            crew,
            trucks: rules::trucks_for_crew(crew),
            billable_hours: rules::billable_hours(ctx.request, crew),
            travel_hours: rules::truck_travel_hours(ctx.travel, ONE_LEG_FACTOR)?,
            hourly_rate: RATES.rate_for(crew),
        };

        let one_way_km = ctx.travel.one_way_km();
        let travel = if Self::is_linehaul(one_way_km) {
            let km = decimal_from_f64(one_way_km).ok_or_else(|| {
                DomainError::calculation_fault(format!("non-finite route distance: {one_way_km}"))
            })?;
            km * LINEHAUL_PER_KM
        } else {
            staffing.travel_hours * staffing.hourly_rate
        };

        let breakdown = CostBreakdown {
            labor: staffing.billable_hours * staffing.hourly_rate,
            travel,
            truck_fee: TRUCK_FEE * Decimal::from(staffing.trucks),
            heavy_items: PRICES.heavy_items_cost(ctx.request),
            additional_services: PRICES.services_cost(ctx.request),
            markup: Decimal::ZERO,
        };
        Ok(rules::priced_result(ctx, staffing, breakdown))
    }
}
