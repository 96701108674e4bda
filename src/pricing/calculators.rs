//! Core pricing calculation functions shared by both engines.
//!
//! Pure functions for pricing math - no database access.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pricing::engine::PricingError;
use crate::pricing::models::Scenarios;

/// Fixed mobilisation charge for tools, independent of job length.
pub const TOOLS_MOBILIZATION: Decimal = dec!(200);

/// Tools charge per work day.
pub const TOOLS_PER_DAY: Decimal = dec!(100);

/// Setup and cleanup always cost one extra crew-day.
pub const SETUP_CLEANUP_DAYS: Decimal = dec!(1);

pub const MARKUP_30: Decimal = dec!(1.30);
pub const MARKUP_40: Decimal = dec!(1.40);
pub const MARKUP_50: Decimal = dec!(1.50);
pub const MARKUP_60: Decimal = dec!(1.60);

pub const BAD_CASE_20: Decimal = dec!(1.20);
pub const MORE_BAD_CASE_40: Decimal = dec!(1.40);
pub const WORST_CASE_80: Decimal = dec!(1.80);

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use racing_fence_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Round a monetary amount to cents.
pub fn cents(amount: Decimal) -> Decimal {
    round_money(amount, 2)
}

/// Whole work days needed for a fractional estimate.
///
/// Partial days always consume a full day, so this is a ceiling and never
/// a rounding.
pub fn whole_days(estimate: Decimal) -> Decimal {
    estimate.ceil()
}

/// Result of a checked operation, or an out-of-range error on `field`.
///
/// `Decimal` operators panic on overflow, so engine arithmetic on request
/// values goes through `checked_*` and lands here.
pub fn in_range(value: Option<Decimal>, field: &'static str) -> Result<Decimal, PricingError> {
    value.ok_or_else(|| PricingError::invalid(field, "out of range"))
}

/// `a * b * c`, or `None` on overflow.
pub fn product(a: Decimal, b: Decimal, c: Decimal) -> Option<Decimal> {
    a.checked_mul(b)?.checked_mul(c)
}

/// Sum of cost components, or `None` on overflow.
pub fn total(parts: &[Decimal]) -> Option<Decimal> {
    parts
        .iter()
        .try_fold(Decimal::ZERO, |sum, part| sum.checked_add(*part))
}

/// Tools cost: fixed mobilisation plus a daily charge.
pub fn tools_cost(work_days: Decimal) -> Option<Decimal> {
    TOOLS_PER_DAY
        .checked_mul(work_days)?
        .checked_add(TOOLS_MOBILIZATION)
        .map(cents)
}

/// Cost per installed meter.
///
/// `None` when there are no meters to divide by or the quotient overflows.
pub fn rate_per_meter(raw_total: Decimal, meters: Decimal) -> Option<Decimal> {
    if meters > Decimal::ZERO {
        raw_total.checked_div(meters).map(cents)
    } else {
        None
    }
}

/// Markup and risk scenarios derived from a raw total.
///
/// Every figure is a pure function of `raw_total`; nothing else feeds in.
/// `None` when the largest scenario would overflow.
pub fn scenarios(raw_total: Decimal) -> Option<Scenarios> {
    let scaled = |multiplier: Decimal| raw_total.checked_mul(multiplier).map(cents);

    Some(Scenarios {
        markup_30: scaled(MARKUP_30)?,
        markup_40: scaled(MARKUP_40)?,
        markup_50: scaled(MARKUP_50)?,
        markup_60: scaled(MARKUP_60)?,
        bad_case_20: scaled(BAD_CASE_20)?,
        more_bad_case_40: scaled(MORE_BAD_CASE_40)?,
        worst_case_80: scaled(WORST_CASE_80)?,
    })
}

/// Positive override value, if any.
///
/// Both engines treat a zero or negative override as "not supplied".
pub fn positive(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

/// Round a crew size up to the next even number (crews work in pairs).
///
/// `u32::MAX` has no even successor and steps down instead.
pub fn round_up_to_even(count: u32) -> u32 {
    if count % 2 == 0 {
        count
    } else {
        count.checked_add(1).unwrap_or(count - 1)
    }
}

/// Convert a whole-valued decimal to a crew count.
///
/// Saturates at `u32::MAX` for absurdly large estimates.
pub fn to_count(value: Decimal) -> u32 {
    value.ceil().to_u32().unwrap_or(u32::MAX)
}
