//! Rental Fixtures

use serde::Deserialize;

/// Wrapper for rentals in YAML
#[derive(Debug, Deserialize)]
pub struct RentalsFixture {
    /// Rental lines in cart order
    pub rentals: Vec<RentalFixture>,
}

/// Rental fixture from YAML
#[derive(Debug, Deserialize)]
pub struct RentalFixture {
    /// Garment key into the garments fixture
    pub garment: String,

    /// Rental duration in days
    pub days: u32,

    /// How many of the garment are rented
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}
