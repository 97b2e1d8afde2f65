//! Insurance deposits
//!
//! A refundable deposit of 25% of the rental cost is held against damage.
//! Only the charge is computed here; the refund workflow belongs to the
//! order layer.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::percent::{PercentError, percent_of_minor};

/// Errors specific to deposit calculations.
#[derive(Debug, Error)]
pub enum InsuranceError {
    /// Deposits derive from a non-negative rental cost (amount in minor units).
    #[error("rental cost must not be negative, got {0} minor units")]
    NegativeCost(i64),

    /// Wrapped percentage arithmetic error.
    #[error(transparent)]
    Percent(#[from] PercentError),
}

/// Fraction of the rental cost held as a refundable damage deposit.
#[must_use]
pub fn deposit_rate() -> Percentage {
    Percentage::from(0.25)
}

/// Calculates the refundable insurance deposit for a rental cost.
///
/// # Errors
///
/// - [`InsuranceError::NegativeCost`]: `rental_cost` is negative.
/// - [`InsuranceError::Percent`]: the percentage calculation could not be
///   safely represented.
pub fn deposit<'a>(
    rental_cost: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, InsuranceError> {
    let cost_minor = rental_cost.to_minor_units();
    if cost_minor < 0 {
        return Err(InsuranceError::NegativeCost(cost_minor));
    }

    let deposit_minor = percent_of_minor(&deposit_rate(), cost_minor)?;

    Ok(Money::from_minor(deposit_minor, rental_cost.currency()))
}
