//! Northline Moving: static rate card plus a per-km fuel surcharge beyond
//! the included distance.

use super::rules::{self, PriceList, RateCard, Staffing, cents, dollars};
use super::{QuoteContext, TravelLimits, VendorQuoteEngine};
use crate::domain::entities::{CostBreakdown, QuoteResult};
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::VendorId;
use rust_decimal::Decimal;

const RATES: RateCard = RateCard::dollars(139, 179, 219, 259);

const PRICES: PriceList = PriceList {
    piano: dollars(300),
    safe: dollars(250),
    pool_table: dollars(350),
    hot_tub: dollars(450),
    treadmill: dollars(100),
    other: dollars(60),
    packing: dollars(350),
    storage: dollars(250),
    cleaning: dollars(200),
    junk_removal: dollars(175),
    disassembly: dollars(120),
};

/// Trip distance covered by the hourly rate.
const INCLUDED_KM: Decimal = dollars(50);
/// Fuel surcharge per km beyond the included distance.
const FUEL_PER_KM: Decimal = cents(85);
/// Trip multiplier when only the move leg is known.
const ONE_LEG_FACTOR: f64 = 2.2;

/// Northline Moving pricing strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NorthlineEngine;

impl NorthlineEngine {
    /// Fuel surcharge for a trip distance.
    #[must_use]
    pub fn fuel_surcharge(trip_km: Decimal) -> Decimal {
        (trip_km - INCLUDED_KM).max(Decimal::ZERO) * FUEL_PER_KM
    }
}

impl VendorQuoteEngine for NorthlineEngine {
    fn vendor(&self) -> VendorId {
        VendorId::Northline
    }

    fn limits(&self) -> TravelLimits {
        TravelLimits {
            max_route_km: Some(200.0),
            max_one_way_hours: None,
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
        let trip_km = rules::trip_km(ctx.travel, ONE_LEG_FACTOR)?;

        let breakdown = CostBreakdown {
            labor: staffing.billable_hours * staffing.hourly_rate,
            travel: staffing.travel_hours * staffing.hourly_rate,
            truck_fee: Self::fuel_surcharge(trip_km),
            heavy_items: PRICES.heavy_items_cost(ctx.request),
            additional_services: PRICES.services_cost(ctx.request),
            markup: Decimal::ZERO,
        };
        Ok(rules::priced_result(ctx, staffing, breakdown))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::entities::RejectionReason;
    use crate::domain::value_objects::{AdditionalService, HeavyItem, TravelMetrics};

    #[test]
    fn prices_local_three_room_move() {
        let request = request(3);
        let dispatcher = dispatcher(VendorId::Northline);
        let travel = local_travel();
        let ctx = QuoteContext::new(&request, &dispatcher, &travel);

        let result = NorthlineEngine.calculate(&ctx).unwrap();
        let quote = result.priced().unwrap();

        assert_eq!(quote.crew_size, 3);
        assert_eq!(quote.truck_count, 1);
        assert_eq!(quote.hourly_rate, dollars(179));
        assert_eq!(quote.billable_hours, Decimal::new(468, 2));
        // 1.0 h x 1.3
        assert_eq!(quote.travel_hours, Decimal::new(130, 2));
        // 60 km trip, 10 km over
        assert_eq!(quote.breakdown.truck_fee, Decimal::new(850, 2));
        assert_eq!(quote.breakdown.labor, Decimal::new(83_772, 2));
        assert_eq!(quote.breakdown.travel, Decimal::new(23_270, 2));
        assert_eq!(quote.total_cost, Decimal::new(107_892, 2));
    }

    #[test]
    fn extras_are_itemised() {
        let request = request(2)
            .with_heavy_item(HeavyItem::Piano, 1)
            .with_service(AdditionalService::Cleaning);
        let dispatcher = dispatcher(VendorId::Northline);
        let travel = local_travel();
        let ctx = QuoteContext::new(&request, &dispatcher, &travel);

        let quote = NorthlineEngine.calculate(&ctx).unwrap().priced().cloned().unwrap();
        assert_eq!(quote.crew_size, 3);
        assert_eq!(quote.breakdown.heavy_items, dollars(300));
        assert_eq!(quote.breakdown.additional_services, dollars(200));
        assert_eq!(quote.breakdown.markup, Decimal::ZERO);
    }

    #[test]
    fn no_surcharge_within_included_distance() {
        assert_eq!(NorthlineEngine::fuel_surcharge(dollars(40)), Decimal::ZERO);
        assert_eq!(NorthlineEngine::fuel_surcharge(dollars(150)), dollars(85));
    }

    #[test]
    fn rejects_long_routes() {
        let request = request(3);
        let dispatcher = dispatcher(VendorId::Northline);
        let travel = cross_country_travel();
        let ctx = QuoteContext::new(&request, &dispatcher, &travel);

        let result = NorthlineEngine.calculate(&ctx).unwrap();
        assert_eq!(
            result.rejection_reason(),
            Some(RejectionReason::DistanceLimitExceeded)
        );
    }

    #[test]
    fn one_leg_uses_vendor_factor() {
        let request = request(1);
        let dispatcher = dispatcher(VendorId::Northline);
        let travel = TravelMetrics::one_leg(leg(20.0, 0.5));
        let ctx = QuoteContext::new(&request, &dispatcher, &travel);

        let quote = NorthlineEngine.calculate(&ctx).unwrap().priced().cloned().unwrap();
        // 0.5 h x 2.2 x 1.3
        assert_eq!(quote.travel_hours, Decimal::new(143, 2));
        assert_eq!(quote.breakdown.truck_fee, Decimal::ZERO);
    }
}
