//! Discount Schedule Fixtures

use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    schedules::{BundleDiscounts, DiscountRule, DiscountSchedule},
};

/// Wrapper for the bundle discount schedules in YAML
#[derive(Debug, Deserialize)]
pub struct DiscountsFixture {
    /// Rules keyed by rental days
    #[serde(default)]
    pub duration: Vec<RuleFixture>,

    /// Rules keyed by garment count
    #[serde(default)]
    pub quantity: Vec<RuleFixture>,
}

/// Discount rule fixture from YAML
#[derive(Debug, Deserialize)]
pub struct RuleFixture {
    /// Rental days or garment count the rule starts at
    pub threshold: u32,

    /// Discount in whole percentage points
    pub percent: u8,
}

impl From<RuleFixture> for DiscountRule {
    fn from(fixture: RuleFixture) -> Self {
        DiscountRule::new(fixture.threshold, fixture.percent)
    }
}

impl TryFrom<DiscountsFixture> for BundleDiscounts {
    type Error = FixtureError;

    fn try_from(fixture: DiscountsFixture) -> Result<Self, Self::Error> {
        let duration = schedule_from(fixture.duration)?;
        let quantity = schedule_from(fixture.quantity)?;

        Ok(BundleDiscounts::new(duration, quantity))
    }
}

fn schedule_from(rules: Vec<RuleFixture>) -> Result<DiscountSchedule, FixtureError> {
    let rules: Vec<DiscountRule> = rules.into_iter().map(DiscountRule::from).collect();

    Ok(DiscountSchedule::new(rules)?)
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use testresult::TestResult;

    use crate::schedules::ScheduleError;

    use super::*;

    #[test]
    fn discounts_fixture_parses_both_schedules() -> TestResult {
        let yaml = r"
duration:
  - threshold: 7
    percent: 5
  - threshold: 14
    percent: 10
quantity:
  - threshold: 2
    percent: 5
";

        let fixture: DiscountsFixture = serde_norway::from_str(yaml)?;
        let discounts = BundleDiscounts::try_from(fixture)?;

        assert_eq!(discounts.duration().rules().len(), 2);
        assert_eq!(discounts.quantity().rules().len(), 1);
        assert_eq!(
            discounts.duration().applicable_discount(14),
            Percentage::from(0.10)
        );

        Ok(())
    }

    #[test]
    fn missing_schedules_default_to_empty() -> TestResult {
        let fixture: DiscountsFixture = serde_norway::from_str("duration: []")?;
        let discounts = BundleDiscounts::try_from(fixture)?;

        assert!(discounts.duration().is_empty());
        assert!(discounts.quantity().is_empty());

        Ok(())
    }

    #[test]
    fn misordered_thresholds_fail_at_construction() -> TestResult {
        let yaml = r"
duration:
  - threshold: 10
    percent: 5
  - threshold: 5
    percent: 10
";

        let fixture: DiscountsFixture = serde_norway::from_str(yaml)?;
        let result = BundleDiscounts::try_from(fixture);

        assert!(matches!(
            result,
            Err(FixtureError::Schedule(
                ScheduleError::ThresholdsNotIncreasing { prev: 10, next: 5 }
            ))
        ));

        Ok(())
    }
}
