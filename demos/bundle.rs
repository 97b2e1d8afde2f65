//! Bundle Example
//!
//! Prices a rental cart as a bundle, applying the fixture set's duration
//! and quantity discount schedules, and prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to limit the number of rental lines taken from the set
//! Use `-t` to set the tax rate as a fraction

use std::{io, time::Instant};

use anyhow::Result;

use clap::Parser;
use decimal_percentage::Percentage;
use hemline::{fixtures::Fixture, receipt::Receipt, utils::DemoCartArgs};
use humanize_duration::{Truncate, prelude::DurationExt};

/// Bundle Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoCartArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let cart = fixture.cart(args.n)?;

    let start = Instant::now();
    let receipt = Receipt::from_bundle(&cart, fixture.discounts(), Percentage::from(args.tax))?;
    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle, fixture.garment_meta())?;

    println!("\nPriced in {}", elapsed.human(Truncate::Nano));

    Ok(())
}
