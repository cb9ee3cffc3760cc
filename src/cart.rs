//! Cart
//!
//! A session-scoped ledger of cart lines. Each line holds a product, a quantity and the
//! unit price for that quantity; the price is re-resolved from the product's tier table
//! whenever the quantity changes. Totals are recomputed from the lines on every call.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    pricing::{PricingError, line_total, validate_quantity},
    products::{Product, ProductKey},
};

/// Errors raised by cart operations. A failed operation leaves the cart unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantity was negative, zero where a positive value is required, or too large.
    #[error("invalid quantity {0}")]
    InvalidQuantity(i64),

    /// No product with this identifier exists in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The product is unavailable and backorders are not allowed.
    #[error("product {0} is out of stock")]
    OutOfStock(String),

    /// The line would hold fewer units than the product's minimum order quantity.
    #[error("product {product} has a minimum order of {minimum}, got {quantity}")]
    BelowMinimumOrder {
        /// Product id
        product: String,

        /// Minimum order quantity
        minimum: u32,

        /// Requested line quantity
        quantity: u32,
    },

    /// A line references a product missing from the catalog.
    #[error("missing product")]
    MissingProduct(ProductKey),

    /// Quantity or money arithmetic overflowed.
    #[error("cart arithmetic overflowed")]
    Overflow,
}

impl From<PricingError> for CartError {
    fn from(error: PricingError) -> Self {
        match error {
            PricingError::InvalidQuantity(quantity) => Self::InvalidQuantity(quantity),
            PricingError::Overflow => Self::Overflow,
        }
    }
}

/// What to do when an unavailable product is added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackorderPolicy {
    /// Refuse the add with [`CartError::OutOfStock`].
    #[default]
    Reject,

    /// Accept the add; the line is fulfilled once stock arrives.
    Allow,
}

/// Cart behaviour settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CartPolicy {
    /// Backorder handling
    pub backorder: BackorderPolicy,
}

/// One product's quantity and current unit price within a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine<'a> {
    product: ProductKey,
    quantity: u32,
    unit_price: Money<'a, Currency>,
}

impl<'a> CartLine<'a> {
    /// Catalog key of the product.
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Units ordered.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price for the current quantity.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, PricingError> {
        line_total(&self.unit_price, self.quantity)
    }

    fn reprice(&mut self, product: &Product<'a>, quantity: u32) {
        self.quantity = quantity;
        self.unit_price = *product.tiers.tier_for(quantity).1.unit_price();
    }
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'c, 'a> {
    catalog: &'c Catalog<'a>,
    lines: Vec<CartLine<'a>>,
    policy: CartPolicy,
}

impl<'c, 'a> Cart<'c, 'a> {
    /// Create an empty cart over `catalog` with the default policy.
    pub fn new(catalog: &'c Catalog<'a>) -> Self {
        Self::with_policy(catalog, CartPolicy::default())
    }

    /// Create an empty cart over `catalog` with `policy`.
    pub fn with_policy(catalog: &'c Catalog<'a>, policy: CartPolicy) -> Self {
        Self {
            catalog,
            lines: Vec::new(),
            policy,
        }
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// The line's unit price is re-resolved from its new total quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is not positive.
    /// - [`CartError::UnknownProduct`]: the identifier is not in the catalog.
    /// - [`CartError::OutOfStock`]: the product is unavailable and backorders are rejected.
    /// - [`CartError::BelowMinimumOrder`]: the line would hold fewer units than the
    ///   product's minimum order quantity.
    /// - [`CartError::Overflow`]: the merged quantity is too large.
    pub fn add(&mut self, product_id: &str, quantity: i64) -> Result<&CartLine<'a>, CartError> {
        let added = validate_quantity(quantity)?;
        let (key, product) = self.orderable(product_id)?;

        let line = match self.lines.iter().position(|line| line.product == key) {
            Some(idx) => {
                let line = self.lines.get_mut(idx).ok_or(CartError::MissingProduct(key))?;
                let total = line
                    .quantity
                    .checked_add(added)
                    .ok_or(CartError::Overflow)?;

                check_minimum(product, total)?;
                line.reprice(product, total);
                &*line
            }
            None => {
                check_minimum(product, added)?;
                self.push_line(key, product, added)?
            }
        };

        debug!(
            product = product_id,
            quantity = line.quantity,
            unit_price = %line.unit_price,
            "added to cart"
        );

        Ok(line)
    }

    /// Add a product's minimum order quantity, the default amount for a single "add to cart".
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Cart::add`].
    pub fn add_minimum(&mut self, product_id: &str) -> Result<&CartLine<'a>, CartError> {
        let (_, product) = self.orderable(product_id)?;

        self.add(product_id, i64::from(product.min_order_quantity))
    }

    /// Set a product's quantity directly.
    ///
    /// A quantity of zero removes the line and is a no-op when the line is absent. A
    /// positive quantity replaces the line's quantity, inserting the line if needed, and
    /// re-resolves its unit price. Returns the updated line, or `None` after a removal.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is negative or too large.
    /// - [`CartError::UnknownProduct`]: the identifier is not in the catalog.
    /// - [`CartError::OutOfStock`]: the product is unavailable and backorders are rejected.
    /// - [`CartError::BelowMinimumOrder`]: `quantity` is below the product's minimum order.
    pub fn set_quantity(
        &mut self,
        product_id: &str,
        quantity: i64,
    ) -> Result<Option<&CartLine<'a>>, CartError> {
        if quantity == 0 {
            self.remove(product_id);

            return Ok(None);
        }

        let quantity = validate_quantity(quantity)?;
        let (key, product) = self.orderable(product_id)?;

        check_minimum(product, quantity)?;

        let line = match self.lines.iter().position(|line| line.product == key) {
            Some(idx) => {
                let line = self.lines.get_mut(idx).ok_or(CartError::MissingProduct(key))?;

                line.reprice(product, quantity);
                &*line
            }
            None => self.push_line(key, product, quantity)?,
        };

        debug!(
            product = product_id,
            quantity = line.quantity,
            unit_price = %line.unit_price,
            "cart quantity set"
        );

        Ok(Some(line))
    }

    /// Remove a product's line, returning it if it was present.
    pub fn remove(&mut self, product_id: &str) -> Option<CartLine<'a>> {
        let key = self.catalog.key(product_id)?;
        let idx = self.lines.iter().position(|line| line.product == key)?;
        let line = self.lines.remove(idx);

        debug!(product = product_id, "removed from cart");

        Some(line)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of every line's quantity multiplied by its unit price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the total does not fit in minor units.
    pub fn total(&self) -> Result<Money<'a, Currency>, CartError> {
        self.sum(|line| Ok(line.line_total()?.to_minor_units()))
    }

    /// Sum of every line's quantity at the product's list price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the total does not fit in minor units, or
    /// [`CartError::MissingProduct`] if a line's product left the catalog.
    pub fn list_total(&self) -> Result<Money<'a, Currency>, CartError> {
        self.sum(|line| {
            let product = self
                .catalog
                .get(line.product)
                .ok_or(CartError::MissingProduct(line.product))?;

            Ok(line_total(&product.list_price, line.quantity)?.to_minor_units())
        })
    }

    /// Difference between the list-price total and the tiered total.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if either total cannot be calculated.
    pub fn savings(&self) -> Result<Money<'a, Currency>, CartError> {
        let savings = self
            .list_total()?
            .to_minor_units()
            .checked_sub(self.total()?.to_minor_units())
            .ok_or(CartError::Overflow)?;

        Ok(Money::from_minor(savings, self.currency()))
    }

    /// Savings as a fraction of the list-price total.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if either total cannot be calculated.
    pub fn savings_percent(&self) -> Result<Percentage, CartError> {
        let list_minor = self.list_total()?.to_minor_units();

        if list_minor == 0 {
            return Ok(Percentage::from(Decimal::ZERO));
        }

        let savings = Decimal::from(self.savings()?.to_minor_units());

        Ok(Percentage::from(savings / Decimal::from(list_minor)))
    }

    /// Total units across every line.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Get the line for a product.
    pub fn line(&self, product_id: &str) -> Option<&CartLine<'a>> {
        let key = self.catalog.key(product_id)?;

        self.lines.iter().find(|line| line.product == key)
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Owned copy of the lines, for handing to a checkout.
    pub fn snapshot(&self) -> Vec<CartLine<'a>> {
        self.lines.clone()
    }

    /// Catalog this cart prices against.
    pub fn catalog(&self) -> &'c Catalog<'a> {
        self.catalog
    }

    /// Cart policy.
    pub fn policy(&self) -> CartPolicy {
        self.policy
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.catalog.currency()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up a product and check it may be ordered under the cart policy.
    fn orderable(&self, product_id: &str) -> Result<(ProductKey, &'c Product<'a>), CartError> {
        let catalog = self.catalog;
        let (key, product) = catalog
            .find(product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.to_string()))?;

        if !product.available && self.policy.backorder == BackorderPolicy::Reject {
            warn!(product = product_id, "rejected unavailable product");

            return Err(CartError::OutOfStock(product_id.to_string()));
        }

        Ok((key, product))
    }

    fn push_line(
        &mut self,
        product: ProductKey,
        details: &Product<'a>,
        quantity: u32,
    ) -> Result<&CartLine<'a>, CartError> {
        self.lines.push(CartLine {
            product,
            quantity,
            unit_price: *details.tiers.tier_for(quantity).1.unit_price(),
        });

        self.lines.last().ok_or(CartError::MissingProduct(product))
    }

    fn sum(
        &self,
        minor_units: impl Fn(&CartLine<'a>) -> Result<i64, CartError>,
    ) -> Result<Money<'a, Currency>, CartError> {
        let total = self.lines.iter().try_fold(0i64, |acc, line| {
            acc.checked_add(minor_units(line)?)
                .ok_or(CartError::Overflow)
        })?;

        Ok(Money::from_minor(total, self.currency()))
    }
}

fn check_minimum(product: &Product<'_>, quantity: u32) -> Result<(), CartError> {
    if quantity < product.min_order_quantity {
        warn!(
            product = product.id.as_str(),
            minimum = product.min_order_quantity,
            quantity,
            "rejected quantity below minimum order"
        );

        return Err(CartError::BelowMinimumOrder {
            product: product.id.clone(),
            minimum: product.min_order_quantity,
            quantity,
        });
    }

    Ok(())
}
