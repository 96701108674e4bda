//! UK pricing engine.
//!
//! Crews work in pairs at fixed UK day rates, with accommodation, a flat
//! transport charge and concrete for post-set fence types. The crew is either
//! sized to meet a deadline or taken from the request.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::calculators::{
    cents, in_range, positive, product, rate_per_meter, round_up_to_even, scenarios, to_count,
    tools_cost, total, whole_days, SETUP_CLEANUP_DAYS,
};
use super::engine::{PricingEngine, PricingError};
use super::models::{new_id, UkCalculation, UkCostBreakdown, UK_CALCULATOR_TYPE};
use super::reference::ReferenceData;
use super::requests::UkCalculationRequest;

pub const DAILY_RATE_PER_MAN: Decimal = dec!(200.00);
pub const ACCOMMODATION_PER_DAY_PER_MAN: Decimal = dec!(75.00);
pub const TRANSPORTATION_COST: Decimal = dec!(250.00);
pub const CONCRETE_COST_PER_METER: Decimal = dec!(2.00);

/// Fence types whose posts are set in concrete
pub const CONCRETE_FENCE_TYPES: &[&str] = &["PR", "CM", "CT", "HM"];

/// Productivity figures are quoted for a pair of workers.
const BASE_CREW: Decimal = dec!(2);
const MIN_CREW: u32 = 2;
const GATE_HOURS_PER_GATE: Decimal = dec!(2);
const HOURS_PER_DAY: Decimal = dec!(8);

/// UK engine bound to the process reference data
#[derive(Debug, Clone, Copy)]
pub struct UkEngine<'a> {
    reference: &'a ReferenceData,
}

impl<'a> UkEngine<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }
}

/// Number of labourers for a job needing `worker_days` in total.
///
/// Deadline mode applies only when the job is time sensitive and a positive
/// number of days is available; otherwise the requested crew is used. Either
/// way the crew is at least two and even.
fn crew_size(request: &UkCalculationRequest, worker_days: Decimal) -> u32 {
    let deadline = request
        .days_available
        .filter(|days| request.is_time_sensitive && *days > 0);

    let crew = match deadline {
        Some(days) => to_count(worker_days / Decimal::from(days)).max(MIN_CREW),
        None => request
            .num_labourers
            .filter(|n| *n >= MIN_CREW)
            .unwrap_or(MIN_CREW),
    };

    round_up_to_even(crew)
}

impl PricingEngine for UkEngine<'_> {
    type Request = UkCalculationRequest;
    type Calculation = UkCalculation;

    fn calculate(&self, request: &UkCalculationRequest) -> Result<UkCalculation, PricingError> {
        if request.meters < Decimal::ZERO {
            return Err(PricingError::invalid("meters", "must not be negative"));
        }

        let productivity = positive(request.custom_daily_rate)
            .unwrap_or_else(|| self.reference.uk_productivity().rate_for(&request.fence_type));

        // overflow is reported against the input driving the day count
        let rate_field = if positive(request.custom_daily_rate).is_some() {
            "custom_daily_rate"
        } else {
            "meters"
        };

        let gate_hours_total = Decimal::from(request.gates) * GATE_HOURS_PER_GATE;
        let fence_days_for_pair = in_range(request.meters.checked_div(productivity), rate_field)?;
        let gate_days_for_pair = gate_hours_total / HOURS_PER_DAY;
        let worker_days = in_range(
            total(&[fence_days_for_pair, gate_days_for_pair, SETUP_CLEANUP_DAYS])
                .and_then(|days| days.checked_mul(BASE_CREW)),
            rate_field,
        )?;

        let num_labourers = crew_size(request, worker_days);
        let crew = Decimal::from(num_labourers);
        let work_days = whole_days(worker_days / crew);

        let labor_cost = cents(in_range(
            product(crew, DAILY_RATE_PER_MAN, work_days),
            rate_field,
        )?);
        let tools_cost = in_range(tools_cost(work_days), rate_field)?;
        let accommodation_cost = cents(in_range(
            product(crew, ACCOMMODATION_PER_DAY_PER_MAN, work_days),
            rate_field,
        )?);
        let transportation_cost = TRANSPORTATION_COST;
        let concrete_cost = if CONCRETE_FENCE_TYPES.contains(&request.fence_type.as_str()) {
            cents(in_range(
                request.meters.checked_mul(CONCRETE_COST_PER_METER),
                "meters",
            )?)
        } else {
            Decimal::ZERO
        };

        let raw_total = in_range(
            total(&[
                labor_cost,
                tools_cost,
                accommodation_cost,
                transportation_cost,
                concrete_cost,
            ]),
            rate_field,
        )?;
        let rate_per_meter = if request.meters.is_zero() {
            Decimal::ZERO
        } else {
            in_range(rate_per_meter(raw_total, request.meters), "meters")?
        };
        let scenarios =
            scenarios(raw_total).ok_or_else(|| PricingError::invalid(rate_field, "out of range"))?;

        debug!(
            fence_type = %request.fence_type,
            num_labourers,
            %work_days,
            %raw_total,
            "UK calculation"
        );

        let delivery_lead = request
            .delivery_lead
            .clone()
            .filter(|lead| !lead.is_empty())
            .unwrap_or_else(|| request.user_name.clone());

        Ok(UkCalculation {
            id: new_id(),
            calculator_type: UK_CALCULATOR_TYPE.to_string(),
            user_name: request.user_name.clone(),
            project_name: request.project_name.clone(),
            fence_type: request.fence_type.clone(),
            meters: request.meters,
            gates: request.gates,
            is_time_sensitive: request.is_time_sensitive,
            days_available: request.days_available,
            num_labourers,
            delivery_lead: Some(delivery_lead),
            delivery_copilot: request.delivery_copilot.clone(),
            breakdown: UkCostBreakdown {
                work_days,
                num_labourers,
                daily_rate_per_man: DAILY_RATE_PER_MAN,
                labor_cost,
                tools_cost,
                accommodation_cost,
                transportation_cost,
                concrete_cost,
                raw_total,
                rate_per_meter,
                scenarios,
            },
            timestamp: Utc::now(),
        })
    }
}
