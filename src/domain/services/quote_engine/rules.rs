//! Calculation rules shared by every vendor strategy.
//!
//! Crew sizing, truck allocation, labor hours, truck travel time and the
//! per-unit price lists for heavy items and additional services.

use crate::domain::entities::quote_request::QuoteRequest;
use crate::domain::entities::quote_result::{CostBreakdown, PricedQuote, QuoteResult};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::quote_engine::QuoteContext;
use crate::domain::value_objects::money::{decimal_from_f64, round_hours, round_money};
use crate::domain::value_objects::{AdditionalService, HeavyItem, TravelMetrics};
use rust_decimal::Decimal;

/// Largest crew any vendor fields.
pub const MAX_CREW: u8 = 5;

/// Minimum crew once a crew-upgrading heavy item is present.
pub const HEAVY_ITEM_MIN_CREW: u8 = 3;

/// Minimum billable labor hours.
pub const MIN_BILLABLE_HOURS: Decimal = Decimal::TWO;

/// Commercial trucks drive slower than the passenger-car routing data.
pub const TRUCK_TRAVEL_FACTOR: f64 = 1.3;

/// Labor hours by room count for rooms `0..=5`.
const BASE_LABOR_HOURS: [Decimal; 6] = [
    Decimal::from_parts(20, 0, 0, false, 1),
    Decimal::from_parts(30, 0, 0, false, 1),
    Decimal::from_parts(40, 0, 0, false, 1),
    Decimal::from_parts(55, 0, 0, false, 1),
    Decimal::from_parts(70, 0, 0, false, 1),
    Decimal::from_parts(85, 0, 0, false, 1),
];

/// Hours added per room beyond five.
const EXTRA_ROOM_HOURS: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Hours added per stair flight and per elevator end.
const ACCESS_HOURS: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Base crew for a room count.
#[must_use]
pub fn crew_for_rooms(rooms: u32) -> u8 {
    match rooms {
        0..=2 => 2,
        3..=4 => 3,
        5..=6 => 4,
        _ => 5,
    }
}

/// Base crew for a load weight.
#[must_use]
pub fn crew_for_weight(weight_lbs: u32) -> u8 {
    match weight_lbs {
        0..=3_000 => 2,
        3_001..=6_000 => 3,
        6_001..=9_000 => 4,
        _ => 5,
    }
}

/// Applies the heavy-item upgrade and caps the crew at `max_crew`.
#[must_use]
pub fn finalize_crew(base_crew: u8, request: &QuoteRequest, max_crew: u8) -> u8 {
    let crew = if request.has_crew_upgrading_item() {
        base_crew.saturating_add(1).max(HEAVY_ITEM_MIN_CREW)
    } else {
        base_crew
    };
    crew.min(max_crew.max(1))
}

/// Trucks needed for a crew.
#[must_use]
pub fn trucks_for_crew(crew: u8) -> u8 {
    if crew <= 3 { 1 } else { 2 }
}

/// Crew speed-up applied to base labor hours.
#[must_use]
pub fn crew_efficiency(crew: u8) -> Decimal {
    match crew {
        0..=2 => Decimal::ONE,
        3 => Decimal::new(85, 2),
        4 => Decimal::new(75, 2),
        _ => Decimal::new(70, 2),
    }
}

/// Base labor hours for a room count, before crew efficiency.
#[must_use]
pub fn base_labor_hours(rooms: u32) -> Decimal {
    match BASE_LABOR_HOURS.get(rooms as usize) {
        Some(hours) => *hours,
        None => {
            let extra = Decimal::from(rooms.saturating_sub(5));
            Decimal::from_parts(85, 0, 0, false, 1) + extra * EXTRA_ROOM_HOURS
        }
    }
}

/// Billable labor hours, never below [`MIN_BILLABLE_HOURS`].
#[must_use]
pub fn billable_hours(request: &QuoteRequest, crew: u8) -> Decimal {
    let access = Decimal::from(request.total_flights() + request.elevator_count()) * ACCESS_HOURS;
    let hours = base_labor_hours(request.rooms) * crew_efficiency(crew) + access;
    round_hours(hours).max(MIN_BILLABLE_HOURS)
}

/// Truck travel hours for the trip.
///
/// # Errors
///
/// Returns `DomainError::CalculationFault` if the route data is not finite.
pub fn truck_travel_hours(travel: &TravelMetrics, one_leg_factor: f64) -> DomainResult<Decimal> {
    let hours = travel.trip_hours(one_leg_factor) * TRUCK_TRAVEL_FACTOR;
    decimal_from_f64(hours)
        .map(round_hours)
        .ok_or_else(|| DomainError::calculation_fault(format!("non-finite travel hours: {hours}")))
}

/// Trip distance in km as a decimal.
///
/// # Errors
///
/// Returns `DomainError::CalculationFault` if the route data is not finite.
pub fn trip_km(travel: &TravelMetrics, one_leg_factor: f64) -> DomainResult<Decimal> {
    let km = travel.trip_km(one_leg_factor);
    decimal_from_f64(km)
        .ok_or_else(|| DomainError::calculation_fault(format!("non-finite trip distance: {km}")))
}

/// Hourly rates for crews of two to five.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCard {
    /// Two movers.
    pub crew_2: Decimal,
    /// Three movers.
    pub crew_3: Decimal,
    /// Four movers.
    pub crew_4: Decimal,
    /// Five or more movers.
    pub crew_5: Decimal,
}

impl RateCard {
    /// Creates a card from whole-dollar rates.
    #[must_use]
    pub const fn dollars(crew_2: u32, crew_3: u32, crew_4: u32, crew_5: u32) -> Self {
        Self {
            crew_2: dollars(crew_2),
            crew_3: dollars(crew_3),
            crew_4: dollars(crew_4),
            crew_5: dollars(crew_5),
        }
    }

    /// Hourly rate for a crew size.
    #[must_use]
    pub fn rate_for(&self, crew: u8) -> Decimal {
        match crew {
            0..=2 => self.crew_2,
            3 => self.crew_3,
            4 => self.crew_4,
            _ => self.crew_5,
        }
    }
}

/// Per-unit prices for heavy items and additional services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceList {
    /// Piano.
    pub piano: Decimal,
    /// Safe.
    pub safe: Decimal,
    /// Pool table.
    pub pool_table: Decimal,
    /// Hot tub.
    pub hot_tub: Decimal,
    /// Treadmill.
    pub treadmill: Decimal,
    /// Any other heavy item.
    pub other: Decimal,
    /// Packing service.
    pub packing: Decimal,
    /// Storage service.
    pub storage: Decimal,
    /// Cleaning service.
    pub cleaning: Decimal,
    /// Junk removal service.
    pub junk_removal: Decimal,
    /// Disassembly service.
    pub disassembly: Decimal,
}

impl PriceList {
    /// Price of one heavy item.
    #[must_use]
    pub fn heavy_item(&self, item: HeavyItem) -> Decimal {
        match item {
            HeavyItem::Piano => self.piano,
            HeavyItem::Safe => self.safe,
            HeavyItem::PoolTable => self.pool_table,
            HeavyItem::HotTub => self.hot_tub,
            HeavyItem::Treadmill => self.treadmill,
            HeavyItem::Other => self.other,
        }
    }

    /// Price of one additional service.
    #[must_use]
    pub fn service(&self, service: AdditionalService) -> Decimal {
        match service {
            AdditionalService::Packing => self.packing,
            AdditionalService::Storage => self.storage,
            AdditionalService::Cleaning => self.cleaning,
            AdditionalService::JunkRemoval => self.junk_removal,
            AdditionalService::Disassembly => self.disassembly,
        }
    }

    /// Total heavy item surcharge for a request.
    #[must_use]
    pub fn heavy_items_cost(&self, request: &QuoteRequest) -> Decimal {
        request
            .heavy_items
            .iter()
            .map(|(item, count)| self.heavy_item(*item) * Decimal::from(*count))
            .sum()
    }

    /// Total additional service cost for a request.
    #[must_use]
    pub fn services_cost(&self, request: &QuoteRequest) -> Decimal {
        request.services.iter().map(|s| self.service(*s)).sum()
    }
}

/// Whole-dollar decimal for const tables.
#[must_use]
pub const fn dollars(amount: u32) -> Decimal {
    Decimal::from_parts(amount, 0, 0, false, 0)
}

/// Cents decimal for const tables.
#[must_use]
pub const fn cents(amount: u32) -> Decimal {
    Decimal::from_parts(amount, 0, 0, false, 2)
}

/// Crew, hours and rate settled for a priced quote.
#[derive(Debug, Clone, Copy)]
pub struct Staffing {
    /// Movers.
    pub crew: u8,
    /// Trucks.
    pub trucks: u8,
    /// Billable labor hours.
    pub billable_hours: Decimal,
    /// Truck travel hours.
    pub travel_hours: Decimal,
    /// Hourly rate.
    pub hourly_rate: Decimal,
}

/// Rounds the breakdown and assembles the priced result.
#[must_use]
pub fn priced_result(
    ctx: &QuoteContext<'_>,
    staffing: Staffing,
    breakdown: CostBreakdown,
) -> QuoteResult {
    let breakdown = breakdown.rounded();
    let quote = PricedQuote {
        crew_size: staffing.crew,
        truck_count: staffing.trucks,
        billable_hours: staffing.billable_hours,
        travel_hours: staffing.travel_hours,
        hourly_rate: round_money(staffing.hourly_rate),
        breakdown,
        total_cost: breakdown.total(),
    };
    QuoteResult::quoted(
        ctx.request.id,
        ctx.vendor(),
        ctx.dispatcher.id(),
        ctx.dispatcher.name(),
        quote,
    )
}
