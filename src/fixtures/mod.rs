//! Fixtures
//!
//! YAML-backed fixture sets for demos and integration tests: a garment
//! catalog, a list of rental lines and the bundle discount schedules,
//! loaded from `<base>/garments/<set>.yml`, `<base>/rentals/<set>.yml`
//! and `<base>/discounts/<set>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    fixtures::{
        discounts::DiscountsFixture, garments::GarmentsFixture, rentals::RentalsFixture,
    },
    garments::{Garment, GarmentKey},
    items::RentalItem,
    schedules::{BundleDiscounts, ScheduleError},
};

pub mod discounts;
pub mod garments;
pub mod rentals;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Garment not found
    #[error("Garment not found: {0}")]
    GarmentNotFound(String),

    /// Currency mismatch between garments
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No garments loaded yet
    #[error("No garments loaded yet; currency unknown")]
    NoCurrency,

    /// Not enough rentals in fixture
    #[error("Not enough rentals in fixture, available: {available}, requested: {requested}")]
    NotEnoughRentals {
        /// Number of rental lines defined in the fixture
        available: usize,
        /// Number of rental lines requested
        requested: usize,
    },

    /// Invalid discount schedule
    #[error("Invalid discount schedule: {0}")]
    Schedule(#[from] ScheduleError),

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Garment catalog with generated keys
    garment_meta: SlotMap<GarmentKey, Garment<'a>>,

    /// String key -> `SlotMap` key mappings for lookups
    garment_keys: FxHashMap<String, GarmentKey>,

    /// Pre-built rental lines (reference garments by `GarmentKey`)
    items: Vec<RentalItem<'a>>,

    /// Bundle discount schedules
    discounts: BundleDiscounts,

    /// Currency for the fixture set
    currency: Option<&'static rusty_money::iso::Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            garment_meta: SlotMap::with_key(),
            garment_keys: FxHashMap::default(),
            items: Vec::new(),
            discounts: BundleDiscounts::none(),
            currency: None,
        }
    }

    /// Load a whole fixture set: garments, rentals and discounts.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three files cannot be read or
    /// parsed, or the data is inconsistent.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_garments(name)?;
        fixture.load_rentals(name)?;
        fixture.load_discounts(name)?;

        Ok(fixture)
    }

    /// Load garments from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if there
    /// are currency mismatches between garments.
    pub fn load_garments(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("garments").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: GarmentsFixture = serde_norway::from_str(&contents)?;

        for (key, garment_fixture) in fixture.garments {
            // Parse to get currency first (before creating the Garment)
            let (_minor_units, currency) = garments::parse_price(&garment_fixture.price)?;

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            // Now create the garment
            let garment: Garment<'a> = garment_fixture.try_into()?;
            let garment_key = self.garment_meta.insert(garment);

            self.garment_keys.insert(key, garment_key);
        }

        Ok(self)
    }

    /// Load rental lines from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// referenced garment doesn't exist.
    pub fn load_rentals(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("rentals").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: RentalsFixture = serde_norway::from_str(&contents)?;

        for rental in fixture.rentals {
            let garment_key = self
                .garment_keys
                .get(&rental.garment)
                .copied()
                .ok_or_else(|| FixtureError::GarmentNotFound(rental.garment.clone()))?;

            let garment = self
                .garment_meta
                .get(garment_key)
                .ok_or_else(|| FixtureError::GarmentNotFound(rental.garment.clone()))?;

            self.items.push(RentalItem::new(
                garment_key,
                garment.retail_price,
                rental.days,
                rental.quantity,
            ));
        }

        Ok(self)
    }

    /// Load the bundle discount schedules from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// schedules are invalid.
    pub fn load_discounts(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("discounts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: DiscountsFixture = serde_norway::from_str(&contents)?;

        self.discounts = BundleDiscounts::try_from(fixture)?;

        Ok(self)
    }

    /// Build a cart from the fixture's rental lines.
    ///
    /// Takes the first `n` lines when given, all lines otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if more lines are requested than the fixture
    /// defines, or no garments were loaded.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart<'a>, FixtureError> {
        let available = self.items.len();
        let requested = n.unwrap_or(available);

        if requested > available {
            return Err(FixtureError::NotEnoughRentals {
                available,
                requested,
            });
        }

        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;
        let items: Vec<RentalItem<'a>> = self.items.iter().take(requested).copied().collect();

        Ok(Cart::with_items(items, currency)?)
    }

    /// Returns the bundle discount schedules.
    #[must_use]
    pub fn discounts(&self) -> &BundleDiscounts {
        &self.discounts
    }

    /// Returns the garment catalog.
    #[must_use]
    pub fn garment_meta(&self) -> &SlotMap<GarmentKey, Garment<'a>> {
        &self.garment_meta
    }

    /// Look up a garment key by its fixture string key.
    #[must_use]
    pub fn garment_key(&self, key: &str) -> Option<GarmentKey> {
        self.garment_keys.get(key).copied()
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
