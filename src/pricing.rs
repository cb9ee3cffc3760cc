//! Pricing
//!
//! Resolves the unit price a product sells at for a given order quantity, and builds
//! display-only quotes and price-break hints. Nothing here mutates a cart.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::Product;

/// Errors that can occur while resolving prices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Quantity was zero, negative, or too large to price.
    #[error("invalid quantity {0}; quantities must be positive")]
    InvalidQuantity(i64),

    /// Line total does not fit in minor units.
    #[error("line total overflowed")]
    Overflow,
}

/// Validate a caller-supplied order quantity.
///
/// # Errors
///
/// Returns [`PricingError::InvalidQuantity`] if `quantity` is not positive or does not fit
/// in a `u32`.
pub fn validate_quantity(quantity: i64) -> Result<u32, PricingError> {
    u32::try_from(quantity)
        .ok()
        .filter(|&quantity| quantity > 0)
        .ok_or(PricingError::InvalidQuantity(quantity))
}

/// Resolve the unit price of `product` when ordering `quantity` units.
///
/// # Errors
///
/// Returns [`PricingError::InvalidQuantity`] if `quantity` is not positive.
pub fn resolve_price<'a>(
    product: &Product<'a>,
    quantity: i64,
) -> Result<Money<'a, Currency>, PricingError> {
    let quantity = validate_quantity(quantity)?;

    Ok(*product.tiers.tier_for(quantity).1.unit_price())
}

/// Multiply a unit price by a quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn line_total<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Price preview for ordering a quantity of a product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote<'a> {
    /// Quoted quantity
    pub quantity: u32,

    /// Index of the tier that applies
    pub tier: usize,

    /// Unit price at this quantity
    pub unit_price: Money<'a, Currency>,

    /// Unit price multiplied by quantity
    pub line_total: Money<'a, Currency>,
}

/// Quote `quantity` units of `product` without touching any cart.
///
/// # Errors
///
/// Returns a [`PricingError`] if the quantity is invalid or the line total overflows.
pub fn quote<'a>(product: &Product<'a>, quantity: i64) -> Result<PriceQuote<'a>, PricingError> {
    let quantity = validate_quantity(quantity)?;
    let (tier, pricing_tier) = product.tiers.tier_for(quantity);
    let unit_price = *pricing_tier.unit_price();

    Ok(PriceQuote {
        quantity,
        tier,
        unit_price,
        line_total: line_total(&unit_price, quantity)?,
    })
}

/// The next cheaper tier reachable by ordering more units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreak<'a> {
    /// Extra units needed to reach the tier
    pub additional_quantity: u32,

    /// Minimum quantity of the tier
    pub minimum_quantity: u32,

    /// Unit price within the tier
    pub unit_price: Money<'a, Currency>,
}

/// Find the next tier above `quantity` that lowers the unit price.
///
/// Returns `None` when `quantity` already sits in the cheapest tier.
pub fn next_price_break<'a>(product: &Product<'a>, quantity: u32) -> Option<PriceBreak<'a>> {
    let current = product.tiers.tier_for(quantity).1.unit_price().to_minor_units();

    product
        .tiers
        .tiers()
        .iter()
        .find(|tier| {
            tier.minimum_quantity() > quantity && tier.unit_price().to_minor_units() < current
        })
        .map(|tier| PriceBreak {
            additional_quantity: tier.minimum_quantity() - quantity,
            minimum_quantity: tier.minimum_quantity(),
            unit_price: *tier.unit_price(),
        })
}
