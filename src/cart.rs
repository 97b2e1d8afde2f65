//! Cart
//!
//! Folds rental items into priced lines and cart totals. All sums run in
//! minor units at full precision; tax is the only figure rounded here,
//! the per-line rate and deposit round in [`crate::rates`] and
//! [`crate::insurance`].

use decimal_percentage::Percentage;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    insurance::{self, InsuranceError},
    items::{RentalItem, longest_rental},
    percent::{PercentError, is_negative, percent_of_minor},
    rates::{self, RateError},
    schedules::{BundleDiscounts, ScheduleError},
};

/// Errors related to cart construction or totals.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item's currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// An item was not found in the cart.
    #[error("Item {0} not found")]
    ItemNotFound(usize),

    /// An item's quantity is zero.
    #[error("Item {0} has zero quantity")]
    ZeroQuantity(usize),

    /// An item's rental cost overflowed the minor unit range.
    #[error("Item {0} rental cost overflowed")]
    LineOverflow(usize),

    /// Tax rates cannot be negative.
    #[error("tax rate must not be negative")]
    NegativeTaxRate,

    /// Wrapped rate calculation error.
    #[error(transparent)]
    Rate(#[from] RateError),

    /// Wrapped deposit calculation error.
    #[error(transparent)]
    Insurance(#[from] InsuranceError),

    /// Wrapped discount schedule error.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Wrapped percentage arithmetic error.
    #[error(transparent)]
    Percent(#[from] PercentError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A rental item priced for its full period.
///
/// Produced fresh on every computation and never stored back into the
/// cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedItem<'a> {
    daily_rate: Money<'a, Currency>,
    line_total: Money<'a, Currency>,
    insurance_fee: Money<'a, Currency>,
}

impl<'a> PricedItem<'a> {
    /// Returns the per-day rental charge.
    pub fn daily_rate(&self) -> Money<'a, Currency> {
        self.daily_rate
    }

    /// Returns the rental cost over the whole period and quantity.
    pub fn line_total(&self) -> Money<'a, Currency> {
        self.line_total
    }

    /// Returns the refundable deposit held for the line.
    pub fn insurance_fee(&self) -> Money<'a, Currency> {
        self.insurance_fee
    }
}

/// Totals for a priced cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals<'a> {
    /// Rental cost of all lines, after any bundle discount
    pub subtotal: Money<'a, Currency>,

    /// Tax on the subtotal
    pub tax: Money<'a, Currency>,

    /// Refundable deposits over all lines
    pub insurance_total: Money<'a, Currency>,

    /// Amount charged at checkout
    pub total: Money<'a, Currency>,
}

/// Cart
#[derive(Debug)]
pub struct Cart<'a> {
    items: Vec<RentalItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given items.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if there was a currency mismatch error.
    pub fn with_items(
        items: impl Into<Vec<RentalItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            let item_currency = item.base_price().currency();

            if item_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    i,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Cart { items, currency })
    }

    /// Get an item from the cart.
    ///
    /// # Errors
    ///
    /// Returns a `CartError::ItemNotFound` if the item is not found.
    pub fn get_item(&'a self, item: usize) -> Result<&'a RentalItem<'a>, CartError> {
        self.items.get(item).ok_or(CartError::ItemNotFound(item))
    }

    /// Iterate over the items in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &RentalItem<'a>> {
        self.items.iter()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Total garment count over all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity()))
    }

    /// The longest rental duration over all lines, in days.
    #[must_use]
    pub fn longest_duration(&self) -> u32 {
        longest_rental(&self.items).map_or(0, RentalItem::duration_days)
    }

    /// Price every line in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any line has a zero quantity, an invalid
    /// duration or price, or its rental cost overflows.
    pub fn priced_items(&self) -> Result<Vec<PricedItem<'a>>, CartError> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| self.price_item(idx, item))
            .collect()
    }

    /// Compute totals over the cart at the given tax rate.
    ///
    /// An empty cart yields all-zero totals. Calling this twice with the
    /// same cart and rate yields the same totals.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if `tax_rate` is negative or any line fails
    /// to price.
    pub fn compute_totals(&self, tax_rate: Percentage) -> Result<CartTotals<'a>, CartError> {
        if is_negative(&tax_rate) {
            return Err(CartError::NegativeTaxRate);
        }

        let priced = self.priced_items()?;
        let subtotal = self.sum(priced.iter().map(PricedItem::line_total))?;
        let insurance_total = self.sum(priced.iter().map(PricedItem::insurance_fee))?;

        self.totals_from(subtotal, insurance_total, tax_rate)
    }

    /// Compute totals for the cart priced as a bundle.
    ///
    /// The duration discount keys off the longest rental in the cart and
    /// the quantity discount off the total garment count; both apply to
    /// the subtotal before tax. Deposits derive from the undiscounted
    /// line costs.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if `tax_rate` is negative or any line fails
    /// to price.
    pub fn compute_bundle_totals(
        &self,
        discounts: &BundleDiscounts,
        tax_rate: Percentage,
    ) -> Result<CartTotals<'a>, CartError> {
        if is_negative(&tax_rate) {
            return Err(CartError::NegativeTaxRate);
        }

        let priced = self.priced_items()?;
        let gross = self.sum(priced.iter().map(PricedItem::line_total))?;
        let insurance_total = self.sum(priced.iter().map(PricedItem::insurance_fee))?;

        let subtotal = discounts.apply(&gross, self.longest_duration(), self.total_quantity())?;

        self.totals_from(subtotal, insurance_total, tax_rate)
    }

    fn price_item(&self, idx: usize, item: &RentalItem<'a>) -> Result<PricedItem<'a>, CartError> {
        if item.quantity() == 0 {
            return Err(CartError::ZeroQuantity(idx));
        }

        let daily_rate = rates::daily_rate(item.base_price(), item.duration_days())?;

        let line_minor = daily_rate
            .to_minor_units()
            .checked_mul(i64::from(item.duration_days()))
            .and_then(|cost| cost.checked_mul(i64::from(item.quantity())))
            .ok_or(CartError::LineOverflow(idx))?;

        let line_total = Money::from_minor(line_minor, self.currency);
        let insurance_fee = insurance::deposit(&line_total)?;

        Ok(PricedItem {
            daily_rate,
            line_total,
            insurance_fee,
        })
    }

    fn sum(
        &self,
        monies: impl Iterator<Item = Money<'a, Currency>>,
    ) -> Result<Money<'a, Currency>, CartError> {
        let mut total = Money::from_minor(0, self.currency);

        for money in monies {
            total = total.add(money)?;
        }

        Ok(total)
    }

    fn totals_from(
        &self,
        subtotal: Money<'a, Currency>,
        insurance_total: Money<'a, Currency>,
        tax_rate: Percentage,
    ) -> Result<CartTotals<'a>, CartError> {
        let tax_minor = percent_of_minor(&tax_rate, subtotal.to_minor_units())?;
        let tax = Money::from_minor(tax_minor, self.currency);

        let total = subtotal.add(tax)?.add(insurance_total)?;

        Ok(CartTotals {
            subtotal,
            tax,
            insurance_total,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{EUR, USD},
    };
    use testresult::TestResult;

    use crate::{
        garments::GarmentKey,
        schedules::{DiscountRule, DiscountSchedule},
    };

    use super::*;

    fn test_items<'a>() -> [RentalItem<'a>; 2] {
        [
            RentalItem::new(GarmentKey::default(), Money::from_minor(10_000, USD), 3, 1),
            RentalItem::new(GarmentKey::default(), Money::from_minor(5000, USD), 10, 1),
        ]
    }

    #[test]
    fn with_items_currency_mismatch_errors() {
        let items = [
            RentalItem::new(GarmentKey::default(), Money::from_minor(100, USD), 3, 1),
            RentalItem::new(GarmentKey::default(), Money::from_minor(100, EUR), 3, 1),
        ];

        let result = Cart::with_items(items, USD);

        match result {
            Err(CartError::CurrencyMismatch(idx, item_currency, cart_currency)) => {
                assert_eq!(idx, 1);
                assert_eq!(item_currency, EUR.iso_alpha_code);
                assert_eq!(cart_currency, USD.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn priced_items_match_rate_tiers() -> TestResult {
        let cart = Cart::with_items(test_items(), USD)?;

        let priced = cart.priced_items()?;

        let first = priced.first().ok_or("missing first line")?;
        assert_eq!(first.daily_rate(), Money::from_minor(500, USD));
        assert_eq!(first.line_total(), Money::from_minor(1500, USD));
        assert_eq!(first.insurance_fee(), Money::from_minor(375, USD));

        let second = priced.get(1).ok_or("missing second line")?;
        assert_eq!(second.daily_rate(), Money::from_minor(150, USD));
        assert_eq!(second.line_total(), Money::from_minor(1500, USD));
        assert_eq!(second.insurance_fee(), Money::from_minor(375, USD));

        Ok(())
    }

    #[test]
    fn compute_totals_for_two_line_cart() -> TestResult {
        let cart = Cart::with_items(test_items(), USD)?;

        let totals = cart.compute_totals(Percentage::from(0.08))?;

        assert_eq!(totals.subtotal, Money::from_minor(3000, USD));
        assert_eq!(totals.tax, Money::from_minor(240, USD));
        assert_eq!(totals.insurance_total, Money::from_minor(750, USD));
        assert_eq!(totals.total, Money::from_minor(3990, USD));

        Ok(())
    }

    #[test]
    fn compute_totals_scales_with_quantity() -> TestResult {
        let items = [RentalItem::new(
            GarmentKey::default(),
            Money::from_minor(10_000, USD),
            3,
            2,
        )];
        let cart = Cart::with_items(items, USD)?;

        let totals = cart.compute_totals(Percentage::from(0.0))?;

        assert_eq!(totals.subtotal, Money::from_minor(3000, USD));
        assert_eq!(totals.insurance_total, Money::from_minor(750, USD));

        Ok(())
    }

    #[test]
    fn empty_cart_totals_are_all_zero() -> TestResult {
        let cart = Cart::new(USD);

        let totals = cart.compute_totals(Percentage::from(0.2))?;

        assert_eq!(totals.subtotal, Money::from_minor(0, USD));
        assert_eq!(totals.tax, Money::from_minor(0, USD));
        assert_eq!(totals.insurance_total, Money::from_minor(0, USD));
        assert_eq!(totals.total, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn compute_totals_is_idempotent() -> TestResult {
        let cart = Cart::with_items(test_items(), USD)?;

        let first = cart.compute_totals(Percentage::from(0.08))?;
        let second = cart.compute_totals(Percentage::from(0.08))?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn negative_tax_rate_returns_error() -> TestResult {
        let cart = Cart::with_items(test_items(), USD)?;

        let result = cart.compute_totals(Percentage::from(-0.08));

        assert!(matches!(result, Err(CartError::NegativeTaxRate)));

        Ok(())
    }

    #[test]
    fn zero_quantity_item_returns_error() -> TestResult {
        let items = [RentalItem::new(
            GarmentKey::default(),
            Money::from_minor(10_000, USD),
            3,
            0,
        )];
        let cart = Cart::with_items(items, USD)?;

        let result = cart.compute_totals(Percentage::from(0.08));

        assert!(matches!(result, Err(CartError::ZeroQuantity(0))));

        Ok(())
    }

    #[test]
    fn zero_duration_item_surfaces_rate_error() -> TestResult {
        let items = [RentalItem::new(
            GarmentKey::default(),
            Money::from_minor(10_000, USD),
            0,
            1,
        )];
        let cart = Cart::with_items(items, USD)?;

        let result = cart.compute_totals(Percentage::from(0.08));

        assert!(matches!(result, Err(CartError::Rate(RateError::ZeroDuration))));

        Ok(())
    }

    #[test]
    fn bundle_totals_discount_subtotal_but_not_deposits() -> TestResult {
        let discounts = BundleDiscounts::new(
            DiscountSchedule::new(vec![DiscountRule::new(7, 10)])?,
            DiscountSchedule::new(vec![DiscountRule::new(2, 10)])?,
        );

        // Lines total 30.00 gross; longest rental 10 days and 2 garments,
        // so both 10% discounts apply in sequence: 30.00 -> 27.00 -> 24.30.
        let cart = Cart::with_items(test_items(), USD)?;
        let totals = cart.compute_bundle_totals(&discounts, Percentage::from(0.08))?;

        assert_eq!(totals.subtotal, Money::from_minor(2430, USD));
        assert_eq!(totals.tax, Money::from_minor(194, USD));
        assert_eq!(totals.insurance_total, Money::from_minor(750, USD));
        assert_eq!(totals.total, Money::from_minor(3374, USD));

        Ok(())
    }

    #[test]
    fn bundle_totals_without_discounts_match_plain_totals() -> TestResult {
        let cart = Cart::with_items(test_items(), USD)?;

        let plain = cart.compute_totals(Percentage::from(0.08))?;
        let bundled = cart.compute_bundle_totals(&BundleDiscounts::none(), Percentage::from(0.08))?;

        assert_eq!(plain, bundled);

        Ok(())
    }

    #[test]
    fn total_quantity_and_longest_duration() -> TestResult {
        let cart = Cart::with_items(test_items(), USD)?;

        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.longest_duration(), 10);

        Ok(())
    }

    #[test]
    fn get_item_missing_returns_error() {
        let cart = Cart::new(USD);

        let err = cart.get_item(0).err();

        assert!(matches!(err, Some(CartError::ItemNotFound(0))));
    }
}
