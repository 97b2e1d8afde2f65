//! Hemline
//!
//! Hemline is the pricing engine for a peer-to-peer wardrobe rental marketplace: tiered
//! daily rates, refundable damage deposits, bundle discount schedules and cart totals.

pub mod cart;
pub mod fixtures;
pub mod garments;
pub mod insurance;
pub mod items;
pub mod percent;
pub mod prelude;
pub mod rates;
pub mod receipt;
pub mod schedules;
pub mod utils;
