//! Hemline prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartTotals, PricedItem},
    fixtures::{Fixture, FixtureError},
    garments::{Garment, GarmentKey},
    insurance::{InsuranceError, deposit, deposit_rate},
    items::{RentalItem, longest_rental},
    percent::{PercentError, percent_of_minor},
    rates::{RateError, daily_rate, tier_rate},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    schedules::{BundleDiscounts, DiscountRule, DiscountSchedule, ScheduleError},
};
