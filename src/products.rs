//! Products

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

use crate::{
    inventory::{StockLevels, StockStatus},
    tiers::TierTable,
};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product identifier, unique within a catalog
    pub id: String,

    /// Stock keeping unit
    pub sku: String,

    /// Display name
    pub name: String,

    /// Free-text description, searched by catalog queries
    pub description: String,

    /// Catalog category
    pub category: String,

    /// Manufacturer or brand, if known
    pub brand: Option<String>,

    /// Manufacturer list price, before wholesale tiers
    pub list_price: Money<'a, Currency>,

    /// Wholesale pricing tiers
    pub tiers: TierTable<'a>,

    /// Average customer rating
    pub rating: Decimal,

    /// Units currently in stock
    pub stock: u32,

    /// Whether the product can be ordered
    pub available: bool,

    /// Smallest quantity a cart line may hold; also the default add amount
    pub min_order_quantity: u32,

    /// Reorder levels used for stock status
    pub stock_levels: Option<StockLevels>,
}

impl<'a> Product<'a> {
    /// Create an available product with the given identity, list price and tiers.
    ///
    /// Remaining fields start empty; set them directly or with the `with_*` helpers.
    pub fn new(
        id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        list_price: Money<'a, Currency>,
        tiers: TierTable<'a>,
    ) -> Self {
        Self {
            id: id.into(),
            sku: sku.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            brand: None,
            list_price,
            tiers,
            rating: Decimal::ZERO,
            stock: 0,
            available: true,
            min_order_quantity: 1,
            stock_levels: None,
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the brand.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set the rating.
    #[must_use]
    pub fn with_rating(mut self, rating: Decimal) -> Self {
        self.rating = rating;
        self
    }

    /// Set stock and availability.
    #[must_use]
    pub fn with_stock(mut self, stock: u32, available: bool) -> Self {
        self.stock = stock;
        self.available = available;
        self
    }

    /// Set the minimum order quantity. Zero is treated as one.
    #[must_use]
    pub fn with_min_order_quantity(mut self, quantity: u32) -> Self {
        self.min_order_quantity = quantity.max(1);
        self
    }

    /// Set reorder levels.
    #[must_use]
    pub fn with_stock_levels(mut self, levels: StockLevels) -> Self {
        self.stock_levels = Some(levels);
        self
    }

    /// Unit price for a single unit, as shown in listings.
    pub fn base_price(&self) -> &Money<'a, Currency> {
        self.tiers.base().unit_price()
    }

    /// Stock status against the reorder levels, if the product has any.
    pub fn stock_status(&self) -> Option<StockStatus> {
        self.stock_levels
            .map(|levels| StockStatus::classify(self.stock, levels))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn base_price_is_first_tier() -> TestResult {
        let tiers = TierTable::from_minor([(1, 1000), (10, 800), (50, 600)], USD)?;
        let product = Product::new("p", "P-1", "Product", Money::from_minor(1200, USD), tiers);

        assert_eq!(product.base_price(), &Money::from_minor(1000, USD));
        assert!(product.available);
        assert_eq!(product.min_order_quantity, 1);

        Ok(())
    }

    #[test]
    fn stock_status_requires_levels() -> TestResult {
        let tiers = TierTable::from_minor([(1, 1000), (10, 800), (50, 600)], USD)?;
        let product =
            Product::new("p", "P-1", "Product", Money::from_minor(1200, USD), tiers).with_stock(5, true);

        assert_eq!(product.stock_status(), None);

        let product = product.with_stock_levels(StockLevels::new(10, 100));

        assert_eq!(product.stock_status(), Some(StockStatus::Critical));

        Ok(())
    }

    #[test]
    fn min_order_quantity_is_at_least_one() -> TestResult {
        let tiers = TierTable::from_minor([(1, 1000), (10, 800), (50, 600)], USD)?;
        let product = Product::new("p", "P-1", "Product", Money::from_minor(1200, USD), tiers);

        assert_eq!(product.clone().with_min_order_quantity(5).min_order_quantity, 5);
        assert_eq!(product.with_min_order_quantity(0).min_order_quantity, 1);

        Ok(())
    }
}
