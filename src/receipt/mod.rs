//! Receipt
//!
//! A priced snapshot of a cart: one row per line with its resolved tier, plus the list total,
//! tiered total and savings. Renders to a terminal table.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
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
    cart::{Cart, CartError},
    pricing::{PriceBreak, PricingError, line_total, next_price_break},
};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Cart totals could not be calculated
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Line totals could not be calculated
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error writing the receipt
    #[error("Failed to write receipt")]
    IO,
}

/// A single priced cart line.
#[derive(Debug, Clone)]
pub struct ReceiptLine<'a> {
    /// Product id
    pub product_id: String,

    /// Product name
    pub name: String,

    /// Stock keeping unit
    pub sku: String,

    /// Units ordered
    pub quantity: u32,

    /// Zero-based index of the applied pricing tier
    pub tier: usize,

    /// List price per unit
    pub list_price: Money<'a, Currency>,

    /// Tiered price per unit
    pub unit_price: Money<'a, Currency>,

    /// Tiered line total
    pub line_total: Money<'a, Currency>,

    /// Next cheaper tier, if any
    pub next_break: Option<PriceBreak<'a>>,
}

/// Priced snapshot of a cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 8]>,
    list_total: Money<'a, Currency>,
    total: Money<'a, Currency>,
    savings: Money<'a, Currency>,
    savings_percent: Percentage,
    item_count: u64,
}

impl<'a> Receipt<'a> {
    /// Price every line of `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if a line's product is no longer in the catalog, or if any total
    /// overflows.
    pub fn from_cart(cart: &Cart<'_, 'a>) -> Result<Self, ReceiptError> {
        let lines = cart
            .lines()
            .iter()
            .map(|line| {
                let product = cart
                    .catalog()
                    .get(line.product())
                    .ok_or(CartError::MissingProduct(line.product()))?;

                let (tier, _) = product.tiers.tier_for(line.quantity());

                Ok(ReceiptLine {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    sku: product.sku.clone(),
                    quantity: line.quantity(),
                    tier,
                    list_price: product.list_price,
                    unit_price: *line.unit_price(),
                    line_total: line_total(line.unit_price(), line.quantity())?,
                    next_break: next_price_break(product, line.quantity()),
                })
            })
            .collect::<Result<SmallVec<_>, ReceiptError>>()?;

        Ok(Self {
            lines,
            list_total: cart.list_total()?,
            total: cart.total()?,
            savings: cart.savings()?,
            savings_percent: cart.savings_percent()?,
            item_count: cart.item_count(),
        })
    }

    /// Priced lines, in cart order.
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total at list prices.
    pub fn list_total(&self) -> Money<'a, Currency> {
        self.list_total
    }

    /// Total at tiered prices.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Savings against list prices.
    pub fn savings(&self) -> Money<'a, Currency> {
        self.savings
    }

    /// Savings as a fraction of the list total.
    pub fn savings_percent(&self) -> Percentage {
        self.savings_percent
    }

    /// Total units.
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "",
            "Item",
            "SKU",
            "Qty",
            "Tier",
            "List Price",
            "Unit Price",
            "Line Total",
            "Next Break",
        ]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{}", idx + 1),
                line.name.clone(),
                line.sku.clone(),
                line.quantity.to_string(),
                (line.tier + 1).to_string(),
                line.list_price.to_string(),
                line.unit_price.to_string(),
                line.line_total.to_string(),
                line.next_break.as_ref().map_or_else(String::new, |price_break| {
                    format!(
                        "+{} @ {}",
                        price_break.additional_quantity, price_break.unit_price
                    )
                }),
            ]);
        }

        write_table(&mut out, builder, Columns::new(3..8))?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let rows = [
            ("Items:", self.item_count.to_string(), false),
            ("Subtotal:", self.list_total.to_string(), false),
            (
                "Savings:",
                format!(
                    "({:.2}%) {}",
                    percent_points(self.savings_percent),
                    self.savings
                ),
                false,
            ),
            ("Total:", self.total.to_string(), true),
        ];

        let label_width = rows
            .iter()
            .map(|(label, ..)| label.chars().count())
            .max()
            .unwrap_or_default();

        let value_width = rows
            .iter()
            .map(|(_, value, _)| value.chars().count())
            .max()
            .unwrap_or_default();

        for (label, value, bold) in &rows {
            let line = format!(" {label:>label_width$}  {value:>value_width$}  ");

            let written = if *bold {
                writeln!(out, "{BOLD}{line}{RESET}")
            } else {
                writeln!(out, "{line}")
            };

            written.map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

/// Renders a table built by `builder` with a bold header row and right-aligned `numeric`
/// columns.
///
/// # Errors
///
/// Returns an error if the table cannot be written.
pub fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric: Columns<std::ops::Range<usize>>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(numeric, Alignment::right());

    writeln!(out, "\n{}", dim_borders(&table.to_string())).map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage (0.25) to percent points (25.00).
pub fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Dims the box-drawing characters of a rendered table.
fn dim_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() * 2);
    let mut dimmed = false;

    for ch in table.chars() {
        let border = matches!(ch, '\u{2500}'..='\u{257F}');

        if border != dimmed {
            out.push_str(if border { DIM } else { RESET });
            dimmed = border;
        }

        out.push(ch);
    }

    if dimmed {
        out.push_str(RESET);
    }

    out
}
