//! Easy Haul: static rate card with crew and trucks sized by load weight.

use super::rules::{self, PriceList, RateCard, Staffing, dollars};
use super::{QuoteContext, TravelLimits, VendorQuoteEngine};
use crate::domain::entities::{CostBreakdown, QuoteResult};
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::VendorId;
use rust_decimal::Decimal;

const RATES: RateCard = RateCard::dollars(129, 169, 209, 249);

const PRICES: PriceList = PriceList {
    piano: dollars(275),
    safe: dollars(225),
    pool_table: dollars(325),
    hot_tub: dollars(425),
    treadmill: dollars(90),
    other: dollars(55),
    packing: dollars(280),
    storage: dollars(220),
    cleaning: dollars(230),
    junk_removal: dollars(160),
    disassembly: dollars(110),
};

const TRUCK_FEE: Decimal = dollars(95);
/// Loads above this weight always need a second truck.
const SECOND_TRUCK_LBS: u32 = 8_000;
const ONE_LEG_FACTOR: f64 = 2.3;

/// Easy Haul pricing strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EasyHaulEngine;

impl EasyHaulEngine {
    /// Trucks for a crew and load weight.
    #[must_use]
    pub fn trucks(crew: u8, weight_lbs: u32) -> u8 {
        if weight_lbs > SECOND_TRUCK_LBS {
            2
        } else {
            rules::trucks_for_crew(crew)
        }
    }
}

impl VendorQuoteEngine for EasyHaulEngine {
    fn vendor(&self) -> VendorId {
        VendorId::EasyHaul
    }

    fn limits(&self) -> TravelLimits {
        TravelLimits {
            max_route_km: Some(150.0),
            max_one_way_hours: None,
        }
    }

    fn calculate(&self, ctx: &QuoteContext<'_>) -> DomainResult<QuoteResult> {
        if let Some((reason, message)) = self.limits().violation(ctx.travel) {
            return Ok(ctx.reject(reason, message));
        }

        let weight = ctx.request.estimated_weight_lbs();
        let crew = rules::finalize_crew(rules::crew_for_weight(weight), ctx.request, rules::MAX_CREW);
        let staffing = Staffing {
            crew,
            trucks: Self::trucks(crew, weight),
            billable_hours: rules::billable_hours(ctx.request, crew),
            travel_hours: rules::truck_travel_hours(ctx.travel, ONE_LEG_FACTOR)?,
            hourly_rate: RATES.rate_for(crew),
        };

        let breakdown = CostBreakdown {
            labor: staffing.billable_hours * staffing.hourly_rate,
            travel: staffing.travel_hours * staffing.hourly_rate,
            truck_fee: TRUCK_FEE * Decimal::from(staffing.trucks),
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
    use crate::domain::value_objects::{HeavyItem, TravelMetrics};

    #[test]
    fn crew_follows_estimated_weight() {
        let request = request(3);
        let dispatcher = dispatcher(VendorId::EasyHaul);
        let travel = local_travel();
        let ctx = QuoteContext::new(&request, &dispatcher, &travel);

        let quote = EasyHaulEngine.calculate(&ctx).unwrap().priced().cloned().unwrap();
        // 4000 lbs
        assert_eq!(quote.crew_size, 3);
        assert_eq!(quote.truck_count, 1);
        assert_eq!(quote.hourly_rate, dollars(169));
        assert_eq!(quote.breakdown.truck_fee, dollars(95));
        // 4.68 h x 169 + 1.30 h x 169 + 95
        assert_eq!(quote.total_cost, Decimal::new(110_562, 2));
    }

    #[test]
    fn square_footage_can_raise_crew() {
        let request = request(2).with_square_feet(1_400);
        let dispatcher = dispatcher(VendorId::EasyHaul);
        let travel = local_travel();
        let ctx = QuoteContext::new(&request, &dispatcher, &travel);

        let quote = EasyHaulEngine.calculate(&ctx).unwrap().priced().cloned().unwrap();
        // 9800 lbs
        assert_eq!(quote.crew_size, 5);
        assert_eq!(quote.truck_count, 2);
        assert_eq!(quote.breakdown.truck_fee, dollars(190));
    }

    #[test]
    fn heavy_load_forces_second_truck() {
        assert_eq!(EasyHaulEngine::trucks(3, 8_500), 2);
        assert_eq!(EasyHaulEngine::trucks(3, 8_000), 1);
        assert_eq!(EasyHaulEngine::trucks(4, 1_000), 2);
    }

    #[test]
    fn hot_tub_upgrades_light_load() {
        let request = request(1).with_heavy_item(HeavyItem::HotTub, 1);
        let dispatcher = dispatcher(VendorId::EasyHaul);
        let travel = local_travel();
        let ctx = QuoteContext::new(&request, &dispatcher, &travel);

        let quote = EasyHaulEngine.calculate(&ctx).unwrap().priced().cloned().unwrap();
        assert_eq!(quote.crew_size, 3);
        assert_eq!(quote.breakdown.heavy_items, dollars(425));
    }

    #[test]
    fn rejects_beyond_route_ceiling() {
        let request = request(2);
        let dispatcher = dispatcher(VendorId::EasyHaul);
        let travel = TravelMetrics::one_leg(leg(160.0, 1.8));
        let ctx = QuoteContext::new(&request, &dispatcher, &travel);

        let result = EasyHaulEngine.calculate(&ctx).unwrap();
        assert_eq!(
            result.rejection_reason(),
            Some(RejectionReason::DistanceLimitExceeded)
        );
    }
}
