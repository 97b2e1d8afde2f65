//! Garments

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Garment Key
    pub struct GarmentKey;
}

/// A garment listed for rental.
#[derive(Debug, Clone)]
pub struct Garment<'a> {
    /// Garment name
    pub name: String,

    /// Retail value of the garment, used to derive rental rates
    pub retail_price: Money<'a, Currency>,
}
