//! Discount schedules
//!
//! Threshold-keyed percentage discounts for bundle rentals. A schedule is
//! an ordered set of rules; the rule with the largest threshold at or
//! below the evaluated value wins, and a value below every threshold
//! earns no discount. Two schedules apply to a bundle, one keyed by
//! rental duration and one by item count, composed sequentially.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::percent::{PercentError, percent_of_minor};

/// Errors raised while building or applying a discount schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A rule's percentage lies outside 0-100.
    #[error("discount percentage for threshold {threshold} must be within 0-100, got {percent}")]
    PercentOutOfRange {
        /// Threshold of the offending rule
        threshold: u32,
        /// Out-of-range percentage
        percent: u8,
    },

    /// Rule thresholds must strictly increase.
    #[error("rule thresholds must strictly increase, got {next} after {prev}")]
    ThresholdsNotIncreasing {
        /// Threshold of the preceding rule
        prev: u32,
        /// Offending threshold
        next: u32,
    },

    /// Rule percentages must not decrease as thresholds grow.
    #[error("discount percentages must not decrease, got {next}% after {prev}%")]
    PercentDecreasing {
        /// Percentage of the preceding rule
        prev: u8,
        /// Offending percentage
        next: u8,
    },

    /// Wrapped percentage arithmetic error.
    #[error(transparent)]
    Percent(#[from] PercentError),
}

/// A single threshold rule: at or above `threshold`, discount by `percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountRule {
    threshold: u32,
    percent: u8,
}

impl DiscountRule {
    /// Creates a new rule discounting by `percent` percent from `threshold` upwards.
    #[must_use]
    pub fn new(threshold: u32, percent: u8) -> Self {
        Self { threshold, percent }
    }

    /// Returns the threshold (rental days or item count) the rule starts at.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns the discount in whole percentage points.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Returns the discount as a fraction.
    #[must_use]
    pub fn fraction(&self) -> Percentage {
        Percentage::from(Decimal::new(i64::from(self.percent), 2))
    }
}

/// An ordered set of discount rules keyed by threshold.
///
/// Construction validates the configuration; evaluation can then never
/// fail. An empty schedule is valid and never discounts.
#[derive(Debug, Clone, Default)]
pub struct DiscountSchedule {
    rules: Vec<DiscountRule>,
}

impl DiscountSchedule {
    /// Creates a schedule from rules ordered by ascending threshold.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::PercentOutOfRange`]: a rule discounts by more
    ///   than 100%.
    /// - [`ScheduleError::ThresholdsNotIncreasing`]: thresholds are not
    ///   strictly increasing.
    /// - [`ScheduleError::PercentDecreasing`]: a later rule discounts less
    ///   than an earlier one.
    pub fn new(rules: impl Into<Vec<DiscountRule>>) -> Result<Self, ScheduleError> {
        let rules = rules.into();

        for rule in &rules {
            if rule.percent > 100 {
                return Err(ScheduleError::PercentOutOfRange {
                    threshold: rule.threshold,
                    percent: rule.percent,
                });
            }
        }

        for pair in rules.windows(2) {
            let (Some(prev), Some(next)) = (pair.first(), pair.get(1)) else {
                continue;
            };

            if next.threshold <= prev.threshold {
                return Err(ScheduleError::ThresholdsNotIncreasing {
                    prev: prev.threshold,
                    next: next.threshold,
                });
            }

            if next.percent < prev.percent {
                return Err(ScheduleError::PercentDecreasing {
                    prev: prev.percent,
                    next: next.percent,
                });
            }
        }

        Ok(Self { rules })
    }

    /// Creates a schedule that never discounts.
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Returns the rules in ascending threshold order.
    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    /// Check if the schedule has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the discount for a value as a fraction.
    ///
    /// Selects the rule with the largest threshold at or below `value`;
    /// a value below every threshold earns a 0% discount.
    #[must_use]
    pub fn applicable_discount(&self, value: u32) -> Percentage {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.threshold <= value)
            .map_or_else(|| Percentage::from(0.0), DiscountRule::fraction)
    }

    /// Applies the discount for `value` to an amount.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError::Percent`] if the percentage calculation
    /// could not be safely represented or money arithmetic fails.
    pub fn apply<'a>(
        &self,
        amount: &Money<'a, Currency>,
        value: u32,
    ) -> Result<Money<'a, Currency>, ScheduleError> {
        let discount = self.applicable_discount(value);
        let off_minor = percent_of_minor(&discount, amount.to_minor_units())?;

        let discounted = amount
            .sub(Money::from_minor(off_minor, amount.currency()))
            .map_err(PercentError::Money)?;

        Ok(discounted)
    }
}

/// The pair of schedules applying to a bundle rental.
///
/// The duration discount applies to the base subtotal first, then the
/// quantity discount applies to the already-discounted amount. The two
/// percentages deliberately do not add.
#[derive(Debug, Clone, Default)]
pub struct BundleDiscounts {
    duration: DiscountSchedule,
    quantity: DiscountSchedule,
}

impl BundleDiscounts {
    /// Creates a discount pair from a duration-keyed and a quantity-keyed schedule.
    #[must_use]
    pub fn new(duration: DiscountSchedule, quantity: DiscountSchedule) -> Self {
        Self { duration, quantity }
    }

    /// Creates a discount pair that never discounts.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns the duration-keyed schedule.
    pub fn duration(&self) -> &DiscountSchedule {
        &self.duration
    }

    /// Returns the quantity-keyed schedule.
    pub fn quantity(&self) -> &DiscountSchedule {
        &self.quantity
    }

    /// Applies both schedules to a bundle subtotal, duration first.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] if either application fails.
    pub fn apply<'a>(
        &self,
        subtotal: &Money<'a, Currency>,
        duration_days: u32,
        item_count: u32,
    ) -> Result<Money<'a, Currency>, ScheduleError> {
        let after_duration = self.duration.apply(subtotal, duration_days)?;

        self.quantity.apply(&after_duration, item_count)
    }
}
