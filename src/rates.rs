//! Rental rates
//!
//! Maps a rental duration to a per-day rate expressed as a fraction of a
//! garment's base price. Longer rentals earn a cheaper per-day tier:
//! 5% of base for 1-3 days, 4% for 4-7, 3% for 8-14, 2% from 15 days.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::percent::{PercentError, percent_of_minor};

/// Errors specific to rate calculations.
#[derive(Debug, Error)]
pub enum RateError {
    /// Rental durations start at one day.
    #[error("rental duration must be at least one day")]
    ZeroDuration,

    /// Base prices cannot be negative (amount in minor units).
    #[error("base price must not be negative, got {0} minor units")]
    NegativePrice(i64),

    /// Wrapped percentage arithmetic error.
    #[error(transparent)]
    Percent(#[from] PercentError),
}

/// Per-day rate as a fraction of the base price for a rental duration.
///
/// Returns `None` when `duration_days` is zero; there is no tier for a
/// rental that never happens.
#[must_use]
pub fn tier_rate(duration_days: u32) -> Option<Percentage> {
    match duration_days {
        0 => None,
        1..=3 => Some(Percentage::from(0.05)),
        4..=7 => Some(Percentage::from(0.04)),
        8..=14 => Some(Percentage::from(0.03)),
        _ => Some(Percentage::from(0.02)),
    }
}

/// Calculates the per-day rental charge for a garment.
///
/// The result is the tier rate for `duration_days` applied to
/// `base_price`, rounded to whole minor units half-up.
///
/// # Errors
///
/// - [`RateError::ZeroDuration`]: `duration_days` is zero.
/// - [`RateError::NegativePrice`]: `base_price` is negative.
/// - [`RateError::Percent`]: the percentage calculation could not be
///   safely represented.
pub fn daily_rate<'a>(
    base_price: &Money<'a, Currency>,
    duration_days: u32,
) -> Result<Money<'a, Currency>, RateError> {
    let rate = tier_rate(duration_days).ok_or(RateError::ZeroDuration)?;

    let base_minor = base_price.to_minor_units();
    if base_minor < 0 {
        return Err(RateError::NegativePrice(base_minor));
    }

    let rate_minor = percent_of_minor(&rate, base_minor)?;

    Ok(Money::from_minor(rate_minor, base_price.currency()))
}
