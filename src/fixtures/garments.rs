//! Garment Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso};
use serde::Deserialize;

use crate::{fixtures::FixtureError, garments::Garment};

/// Wrapper for garments in YAML
#[derive(Debug, Deserialize)]
pub struct GarmentsFixture {
    /// Map of garment key -> garment fixture
    pub garments: FxHashMap<String, GarmentFixture>,
}

/// Garment fixture from YAML
#[derive(Debug, Deserialize)]
pub struct GarmentFixture {
    /// Garment name
    pub name: String,

    /// Retail price with currency code, e.g. `"180.00 USD"`
    pub price: String,
}

impl<'a> TryFrom<GarmentFixture> for Garment<'a> {
    type Error = FixtureError;

    fn try_from(fixture: GarmentFixture) -> Result<Self, Self::Error> {
        let (minor, currency) = parse_price(&fixture.price)?;

        Ok(Garment {
            name: fixture.name,
            retail_price: Money::from_minor(minor, currency),
        })
    }
}

/// Parse a `"12.50 USD"` style price into minor units and a currency.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not an
/// amount followed by a currency code, or the amount has more decimal
/// places than the currency carries, and
/// [`FixtureError::UnknownCurrency`] for an unrecognised code.
pub fn parse_price(price: &str) -> Result<(i64, &'static iso::Currency), FixtureError> {
    let invalid = || FixtureError::InvalidPrice(price.to_string());

    let mut parts = price.split_whitespace();
    let amount = parts.next().ok_or_else(invalid)?;
    let code = parts.next().ok_or_else(invalid)?;

    if parts.next().is_some() {
        return Err(invalid());
    }

    let currency =
        iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    let amount: Decimal = amount.parse().map_err(|_err| invalid())?;

    let scale = Decimal::from(10i64.pow(currency.exponent));
    let scaled = amount.checked_mul(scale).ok_or_else(invalid)?;

    if scaled != scaled.trunc() {
        return Err(invalid());
    }

    scaled.to_i64().ok_or_else(invalid).map(|minor| (minor, currency))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_returns_minor_units_and_currency() -> TestResult {
        let (minor, currency) = parse_price("180.00 USD")?;

        assert_eq!(minor, 18_000);
        assert_eq!(currency, iso::USD);

        Ok(())
    }

    #[test]
    fn parse_price_accepts_whole_amounts() -> TestResult {
        let (minor, currency) = parse_price("45 GBP")?;

        assert_eq!(minor, 4500);
        assert_eq!(currency, iso::GBP);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_missing_currency() {
        let result = parse_price("45.00");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("45.00 ZZZ");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(_))));
    }

    #[test]
    fn parse_price_rejects_sub_minor_precision() {
        let result = parse_price("45.005 USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn garment_fixture_converts_to_garment() -> TestResult {
        let fixture = GarmentFixture {
            name: "Silk Evening Gown".to_string(),
            price: "180.00 USD".to_string(),
        };

        let garment = Garment::try_from(fixture)?;

        assert_eq!(garment.name, "Silk Evening Gown");
        assert_eq!(garment.retail_price, Money::from_minor(18_000, iso::USD));

        Ok(())
    }

    #[test]
    fn garments_fixture_parses_from_yaml() -> TestResult {
        let yaml = r#"
garments:
  silk_gown:
    name: "Silk Evening Gown"
    price: "180.00 USD"
  wool_blazer:
    name: "Wool Blazer"
    price: "95.00 USD"
"#;

        let fixture: GarmentsFixture = serde_norway::from_str(yaml)?;

        assert_eq!(fixture.garments.len(), 2);

        Ok(())
    }
}
