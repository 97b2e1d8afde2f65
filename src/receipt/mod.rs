//! Receipt
//!
//! A priced view of a cart: one line per rental with its daily rate,
//! period cost and deposit, plus the cart totals. Receipts render to any
//! [`io::Write`] as a bordered table with a summary block.

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::SlotMap;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartTotals, PricedItem},
    garments::{Garment, GarmentKey},
    schedules::BundleDiscounts,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error pricing the cart.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Error finding a garment in the catalog.
    #[error("Missing garment")]
    MissingGarment(GarmentKey),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One priced rental on a receipt.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptLine<'a> {
    garment: GarmentKey,
    duration_days: u32,
    quantity: u32,
    priced: PricedItem<'a>,
}

impl<'a> ReceiptLine<'a> {
    /// Returns the garment rented on this line.
    pub fn garment(&self) -> GarmentKey {
        self.garment
    }

    /// Returns the rental duration in days.
    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    /// Returns how many of the garment are rented.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the priced figures for the line.
    pub fn priced(&self) -> &PricedItem<'a> {
        &self.priced
    }
}

/// Final priced receipt for a cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Priced lines, one per cart item
    lines: SmallVec<[ReceiptLine<'a>; 8]>,

    /// Rental cost over all lines before any bundle discount
    gross_subtotal: Money<'a, Currency>,

    /// Cart totals, with any bundle discount already applied
    totals: CartTotals<'a>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Price a cart at the given tax rate.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if any line fails to price or the tax
    /// rate is negative.
    pub fn from_cart(cart: &Cart<'a>, tax_rate: Percentage) -> Result<Self, ReceiptError> {
        let totals = cart.compute_totals(tax_rate)?;

        Self::build(cart, totals, totals.subtotal)
    }

    /// Price a cart as a bundle with the given discounts and tax rate.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if any line fails to price or the tax
    /// rate is negative.
    pub fn from_bundle(
        cart: &Cart<'a>,
        discounts: &BundleDiscounts,
        tax_rate: Percentage,
    ) -> Result<Self, ReceiptError> {
        let totals = cart.compute_bundle_totals(discounts, tax_rate)?;
        let gross = cart.compute_totals(Percentage::from(0.0))?.subtotal;

        Self::build(cart, totals, gross)
    }

    fn build(
        cart: &Cart<'a>,
        totals: CartTotals<'a>,
        gross_subtotal: Money<'a, Currency>,
    ) -> Result<Self, ReceiptError> {
        let priced = cart.priced_items()?;

        let lines = cart
            .iter()
            .zip(priced)
            .map(|(item, priced)| ReceiptLine {
                garment: item.garment(),
                duration_days: item.duration_days(),
                quantity: item.quantity(),
                priced,
            })
            .collect();

        Ok(Receipt {
            lines,
            gross_subtotal,
            totals,
            currency: cart.currency(),
        })
    }

    /// Priced lines, one per cart item.
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Rental cost over all lines before any bundle discount.
    #[must_use]
    pub fn gross_subtotal(&self) -> Money<'a, Currency> {
        self.gross_subtotal
    }

    /// Cart totals, with any bundle discount already applied.
    #[must_use]
    pub fn totals(&self) -> &CartTotals<'a> {
        &self.totals
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings earned by bundle discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.gross_subtotal.sub(self.totals.subtotal)
    }

    /// Calculates the savings earned by bundle discounts as a percentage.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = self.savings()?;

        // Percent savings is relative to the pre-discount subtotal. Do the
        // ratio in decimal space to avoid integer truncation.
        let savings_minor = savings.to_minor_units();
        let gross_minor = self.gross_subtotal.to_minor_units();

        if gross_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let gross_dec = Decimal::from_i64(gross_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / gross_dec))
    }

    /// Writes the receipt as a table with a summary block.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line's garment is missing from the
    /// catalog or the receipt cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        garment_meta: &SlotMap<GarmentKey, Garment<'_>>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Garment", "Days", "Qty", "Daily Rate", "Rental", "Deposit"]);

        let mut color_ops: SmallVec<[(usize, usize, Color); 16]> = SmallVec::new();

        for (idx, line) in self.lines.iter().enumerate() {
            let garment = garment_meta
                .get(line.garment)
                .ok_or(ReceiptError::MissingGarment(line.garment))?;

            builder.push_record([
                format!("#{:<3}", idx + 1),
                garment.name.clone(),
                format!("{}d", line.duration_days),
                format!("{}", line.quantity),
                format!("{}", line.priced.daily_rate()),
                format!("{}", line.priced.line_total()),
                format!("{}", line.priced.insurance_fee()),
            ]);

            color_ops.push((idx + 1, 2, color_dark_grey()));
            color_ops.push((idx + 1, 3, color_dark_grey()));
        }

        write_receipt_table(&mut out, builder, color_ops)?;
        write_receipt_summary(&mut out, self)?;

        Ok(())
    }
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: SmallVec<[(usize, usize, Color); 16]>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let savings = receipt.savings()?;
    let has_savings = savings.to_minor_units() != 0;

    let savings_percent_points =
        percent_points_from_fractional_percentage(receipt.savings_percent()?);

    let subtotal_label = " Subtotal:";
    let savings_label = " Savings:";
    let tax_label = " Tax:";
    let deposit_label = " Deposit held:";
    let total_label = " \x1b[1mTotal:\x1b[0m";

    let subtotal_val = format!("{}  ", receipt.gross_subtotal());
    let savings_val = format!("({savings_percent_points:.2}%) -{savings}  ");
    let tax_val = format!("{}  ", receipt.totals().tax);
    let deposit_val = format!("{}  ", receipt.totals().insurance_total);
    let total_val = format!("{}  ", receipt.totals().total);

    let label_width = [
        subtotal_label,
        savings_label,
        tax_label,
        deposit_label,
        total_label,
    ]
    .iter()
    .map(|label| visible_width(label))
    .max()
    .unwrap_or(0);

    let value_width = [&subtotal_val, &savings_val, &tax_val, &deposit_val, &total_val]
        .iter()
        .map(|val| visible_width(val))
        .max()
        .unwrap_or(0);

    write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;

    if has_savings {
        write_summary_line(out, savings_label, &savings_val, label_width, value_width)?;
    }

    write_summary_line(out, tax_label, &tax_val, label_width, value_width)?;
    write_summary_line(out, deposit_label, &deposit_val, label_width, value_width)?;

    write_summary_line(
        out,
        total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::from_i64(100).unwrap_or(Decimal::ZERO)).round_dp(2)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F. This function
/// scans each character, grouping consecutive border characters and emitting a
/// single grey escape sequence around each run, leaving cell content untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_vis = visible_width(label);
    let value_vis = visible_width(value);

    // 2 chars of spacing between label and value column.
    let label_pad = label_col_width.saturating_sub(label_vis);
    let value_pad = value_col_width.saturating_sub(value_vis);

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
