//! International pricing engine.
//!
//! Labour is priced from the destination country's minimum wage for an
//! 8-person crew flown in with a supervisor.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::calculators::{
    cents, in_range, positive, product, rate_per_meter, scenarios, tools_cost, total, whole_days,
    SETUP_CLEANUP_DAYS,
};
use super::engine::{PricingEngine, PricingError};
use super::models::{new_id, Calculation, CostBreakdown, GroundFixingMethod};
use super::reference::ReferenceData;
use super::requests::CalculationRequest;

pub const CREW_SIZE: Decimal = dec!(8);
pub const HOURS_PER_DAY: Decimal = dec!(8);

/// Hourly wage used when a country lists no minimum wage.
pub const WAGE_FLOOR: Decimal = dec!(15.00);

/// Labour is priced at double the minimum wage.
pub const WAGE_MULTIPLIER: Decimal = dec!(2);

/// One gate is 4 man-hours out of the crew's 64 man-hours per day.
pub const GATE_DAYS_PER_GATE: Decimal = dec!(0.0625);

pub const SUPERVISION_PER_DAY: Decimal = dec!(250);
pub const FLIGHT_TICKET: Decimal = dec!(500);

pub const ANGLE_STEEL_PER_METER: Decimal = dec!(1.0);
pub const BASEPLATE_PER_METER: Decimal = dec!(0.078);

impl GroundFixingMethod {
    /// Ground fixing material cost per meter of fence
    pub fn cost_per_meter(&self) -> Decimal {
        match self {
            GroundFixingMethod::InnerGmsPostWithBaseplate => BASEPLATE_PER_METER,
            GroundFixingMethod::AngleSteel | GroundFixingMethod::Other(_) => ANGLE_STEEL_PER_METER,
        }
    }
}

/// International engine bound to the process reference data
#[derive(Debug, Clone, Copy)]
pub struct InternationalEngine<'a> {
    reference: &'a ReferenceData,
}

impl<'a> InternationalEngine<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    /// Effective hourly wage for a country, applying the wage floor.
    fn hourly_wage(&self, country: &str) -> Result<Decimal, PricingError> {
        let listed = self
            .reference
            .min_wage(country)
            .ok_or_else(|| PricingError::InvalidCountry(country.to_string()))?;

        Ok(if listed.is_zero() { WAGE_FLOOR } else { listed })
    }
}

impl PricingEngine for InternationalEngine<'_> {
    type Request = CalculationRequest;
    type Calculation = Calculation;

    fn calculate(&self, request: &CalculationRequest) -> Result<Calculation, PricingError> {
        if request.meters <= Decimal::ZERO {
            return Err(PricingError::invalid("meters", "must be greater than zero"));
        }

        let hourly_wage = self.hourly_wage(&request.country)?;

        let daily_capacity = positive(request.custom_daily_rate).unwrap_or_else(|| {
            self.reference
                .international_productivity()
                .rate_for(&request.fence_type)
        });

        // overflow is reported against the input driving the day count
        let rate_field = if positive(request.custom_daily_rate).is_some() {
            "custom_daily_rate"
        } else {
            "meters"
        };
        let fence_days = in_range(request.meters.checked_div(daily_capacity), rate_field)?;
        let gate_days = Decimal::from(request.gates) * GATE_DAYS_PER_GATE;
        let work_days = whole_days(in_range(
            total(&[fence_days, gate_days, SETUP_CLEANUP_DAYS]),
            rate_field,
        )?);

        let (unrounded_rate, labor_field) = match positive(request.manual_daily_labor_rate) {
            Some(manual) => (manual, "manual_daily_labor_rate"),
            None => (
                in_range(product(WAGE_MULTIPLIER, hourly_wage, HOURS_PER_DAY), "country")?,
                rate_field,
            ),
        };
        let daily_rate_per_man = cents(unrounded_rate);

        let labor_cost = cents(in_range(
            product(CREW_SIZE, unrounded_rate, work_days),
            labor_field,
        )?);
        let tools_cost = in_range(tools_cost(work_days), rate_field)?;
        let supervision_cost = cents(in_range(
            SUPERVISION_PER_DAY.checked_mul(work_days),
            rate_field,
        )?);
        let ground_fixing_cost = cents(in_range(
            request
                .meters
                .checked_mul(request.ground_fixing_method.cost_per_meter()),
            "meters",
        )?);

        let raw_total = in_range(
            total(&[
                labor_cost,
                tools_cost,
                supervision_cost,
                FLIGHT_TICKET,
                ground_fixing_cost,
            ]),
            rate_field,
        )?;
        let rate_per_meter = in_range(rate_per_meter(raw_total, request.meters), "meters")?;
        let scenarios =
            scenarios(raw_total).ok_or_else(|| PricingError::invalid(rate_field, "out of range"))?;

        debug!(
            country = %request.country,
            fence_type = %request.fence_type,
            %work_days,
            %raw_total,
            "International calculation"
        );

        Ok(Calculation {
            id: new_id(),
            user_name: request.user_name.clone(),
            project_name: request.project_name.clone(),
            country: request.country.clone(),
            fence_type: request.fence_type.clone(),
            meters: request.meters,
            gates: request.gates,
            ground_fixing_method: request.ground_fixing_method.clone(),
            breakdown: CostBreakdown {
                work_days,
                daily_rate_per_man,
                labor_cost,
                tools_cost,
                supervision_cost,
                flight_ticket: FLIGHT_TICKET,
                ground_fixing_cost,
                raw_total,
                rate_per_meter,
                scenarios,
            },
            timestamp: Utc::now(),
        })
    }
}
