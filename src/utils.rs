//! Utils

use clap::Parser;

/// Arguments for the cart demos
#[derive(Debug, Parser)]
pub struct DemoCartArgs {
    /// Number of rental lines to take from the fixture set
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Fixture set to use for garments, rentals & discounts
    #[clap(short, long, default_value = "weekend")]
    pub fixture: String,

    /// Tax rate applied to the rental subtotal, as a fraction
    #[clap(short, long, default_value_t = 0.08)]
    pub tax: f64,
}
