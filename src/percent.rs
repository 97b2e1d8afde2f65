//! Percentage utilities
//!
//! Shared helpers for applying fractional percentages to minor-unit
//! amounts. Rates, deposits, discounts and tax all round the same way:
//! to whole minor units, midpoint away from zero.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::MoneyError;
use thiserror::Error;

/// Errors specific to percentage arithmetic.
#[derive(Debug, Error)]
pub enum PercentError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    Conversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculate a percentage of an amount in minor units.
///
/// The result is rounded to whole minor units using
/// [`RoundingStrategy::MidpointAwayFromZero`], i.e. half-up for the
/// non-negative amounts this crate deals in.
///
/// # Errors
///
/// Returns [`PercentError::Conversion`] if the multiplication overflows or
/// the result cannot be represented as an `i64`.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PercentError> {
    let minor = Decimal::from_i64(minor).ok_or(PercentError::Conversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(PercentError::Conversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PercentError::Conversion)
}

/// Returns true if the percentage is below zero.
pub fn is_negative(percent: &Percentage) -> bool {
    ((*percent) * Decimal::ONE) < Decimal::ZERO
}
