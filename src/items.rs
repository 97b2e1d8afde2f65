//! Rental items

use rusty_money::{Money, iso::Currency};

use crate::garments::GarmentKey;

/// A single rental request: a garment, its base price, how long it is
/// rented for and how many of it are rented.
///
/// Items are plain value records and are immutable once constructed.
/// Range validation (duration and quantity of at least one, non-negative
/// price) happens where the numbers are used, in [`crate::rates`] and
/// [`crate::cart`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RentalItem<'a> {
    garment: GarmentKey,
    base_price: Money<'a, Currency>,
    duration_days: u32,
    quantity: u32,
}

impl<'a> RentalItem<'a> {
    /// Creates a new rental item.
    #[must_use]
    pub fn new(
        garment: GarmentKey,
        base_price: Money<'a, Currency>,
        duration_days: u32,
        quantity: u32,
    ) -> Self {
        Self {
            garment,
            base_price,
            duration_days,
            quantity,
        }
    }

    /// Returns the garment being rented.
    pub fn garment(&self) -> GarmentKey {
        self.garment
    }

    /// Returns the base (retail) price the rental rate derives from.
    pub fn base_price(&self) -> &Money<'a, Currency> {
        &self.base_price
    }

    /// Returns the rental duration in days.
    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    /// Returns how many of the garment are rented.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Returns the item with the longest rental duration in a list of items.
pub fn longest_rental<'a>(items: &'a [RentalItem<'a>]) -> Option<&'a RentalItem<'a>> {
    items.iter().max_by_key(|item| item.duration_days())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn accessors_return_constructor_values() {
        let item = RentalItem::new(GarmentKey::default(), Money::from_minor(10_000, USD), 3, 2);

        assert_eq!(item.garment(), GarmentKey::default());
        assert_eq!(item.base_price(), &Money::from_minor(10_000, USD));
        assert_eq!(item.duration_days(), 3);
        assert_eq!(item.quantity(), 2);
    }

    #[test]
    fn test_longest_rental() {
        let short = RentalItem::new(GarmentKey::default(), Money::from_minor(100, USD), 3, 1);
        let long = RentalItem::new(GarmentKey::default(), Money::from_minor(200, USD), 10, 1);
        let items = [short, long];

        let longest = longest_rental(&items);
        assert_eq!(longest.map(RentalItem::duration_days), Some(10));
    }

    #[test]
    fn longest_rental_of_empty_list_is_none() {
        let items: [RentalItem<'static>; 0] = [];

        assert!(longest_rental(&items).is_none());
    }
}
