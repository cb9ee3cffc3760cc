//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    inventory::StockLevels,
    products::Product,
    tiers::{PricingTier, TierTable},
};

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Stock keeping unit
    pub sku: String,

    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Catalog category
    pub category: String,

    /// Brand
    #[serde(default)]
    pub brand: Option<String>,

    /// List price (e.g., "109.99 USD")
    pub list_price: String,

    /// Customer rating (e.g., "4.8"), kept as written and parsed as a decimal
    #[serde(default)]
    pub rating: Option<String>,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Minimum order quantity
    #[serde(default = "default_min_quantity")]
    pub min_quantity: u32,

    /// Availability; defaults to whether any stock is held
    #[serde(default)]
    pub available: Option<bool>,

    /// Reorder levels
    #[serde(default)]
    pub stock_levels: Option<StockLevels>,

    /// Pricing tiers, lowest minimum first
    pub tiers: Vec<TierFixture>,
}

/// Pricing tier fixture
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Minimum order quantity
    pub min: u32,

    /// Unit price (e.g., "89.99 USD")
    pub price: String,
}

impl ProductFixture {
    /// Convert to a [`Product`] with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or the rating cannot be parsed, or if the tiers are
    /// misconfigured.
    pub fn try_into_product(self, id: String) -> Result<Product<'static>, FixtureError> {
        let (list_minor, currency) = parse_price(&self.list_price)?;

        let tiers = self
            .tiers
            .iter()
            .map(|tier| {
                let (minor, currency) = parse_price(&tier.price)?;

                Ok(PricingTier::new(tier.min, Money::from_minor(minor, currency)))
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let tiers = TierTable::new(tiers).map_err(|source| FixtureError::Tiers {
            product: id.clone(),
            source,
        })?;

        let rating = self
            .rating
            .as_deref()
            .map(parse_rating)
            .transpose()?
            .unwrap_or(Decimal::ZERO);

        if self.min_quantity == 0 {
            return Err(FixtureError::InvalidMinQuantity(id));
        }

        Ok(Product {
            available: self.available.unwrap_or(self.stock > 0),
            min_order_quantity: self.min_quantity,
            id,
            sku: self.sku,
            name: self.name,
            description: self.description,
            category: self.category,
            brand: self.brand,
            list_price: Money::from_minor(list_minor, currency),
            tiers,
            rating,
            stock: self.stock,
            stock_levels: self.stock_levels,
        })
    }
}

fn default_min_quantity() -> u32 {
    1
}

/// Parse a non-negative decimal rating (e.g., "4.85").
fn parse_rating(s: &str) -> Result<Decimal, FixtureError> {
    s.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|rating| !rating.is_sign_negative())
        .ok_or_else(|| FixtureError::InvalidRating(s.to_string()))
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::tiers::TierError;

    use super::*;

    fn fixture(tiers: &str) -> Result<ProductFixture, serde_norway::Error> {
        serde_norway::from_str(&format!(
            "sku: WDG-1\nname: Widget\ncategory: Electronics\nlist_price: 12.00 USD\nstock: 4\ntiers:\n{tiers}"
        ))
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_supported_currencies() -> TestResult {
        let (usd_minor, usd) = parse_price("1.00 USD")?;
        let (eur_minor, eur) = parse_price("2.50 EUR")?;
        let (gbp_minor, gbp) = parse_price("89.99 GBP")?;

        assert_eq!((usd_minor, usd), (100, USD));
        assert_eq!((eur_minor, eur), (250, EUR));
        assert_eq!((gbp_minor, gbp), (8999, GBP));

        Ok(())
    }

    #[test]
    fn product_fixture_converts_with_defaults() -> TestResult {
        let fixture = fixture(
            "  - { min: 1, price: 10.00 USD }\n  - { min: 10, price: 8.00 USD }\n  - { min: 50, price: 6.00 USD }\n",
        )?;

        let product = fixture.try_into_product("widget".to_string())?;

        assert_eq!(product.id, "widget");
        assert_eq!(product.list_price, Money::from_minor(1200, USD));
        assert_eq!(product.base_price(), &Money::from_minor(1000, USD));
        assert_eq!(product.rating, Decimal::ZERO);
        assert!(product.available);
        assert!(product.brand.is_none());
        assert_eq!(product.min_order_quantity, 1);
        assert!(product.stock_levels.is_none());

        Ok(())
    }

    #[test]
    fn product_fixture_reports_tier_errors_with_product_id() -> TestResult {
        let fixture = fixture(
            "  - { min: 1, price: 10.00 USD }\n  - { min: 10, price: 12.00 USD }\n  - { min: 50, price: 6.00 USD }\n",
        )?;

        let result = fixture.try_into_product("widget".to_string());

        assert!(matches!(
            result,
            Err(FixtureError::Tiers {
                ref product,
                source: TierError::PriceIncrease(1),
            }) if product == "widget"
        ));

        Ok(())
    }

    #[test]
    fn product_fixture_rejects_negative_rating() -> TestResult {
        let mut fixture = fixture(
            "  - { min: 1, price: 10.00 USD }\n  - { min: 10, price: 8.00 USD }\n  - { min: 50, price: 6.00 USD }\n",
        )?;
        fixture.rating = Some("-1.0".to_string());

        let result = fixture.try_into_product("widget".to_string());

        assert!(matches!(result, Err(FixtureError::InvalidRating(ref rating)) if rating == "-1.0"));

        Ok(())
    }

    #[test]
    fn rating_is_parsed_exactly() -> TestResult {
        let fixture: ProductFixture = serde_norway::from_str(
            "sku: WDG-1\nname: Widget\ncategory: Electronics\nlist_price: 12.00 USD\nrating: 4.85\ntiers:\n  - { min: 1, price: 10.00 USD }\n  - { min: 10, price: 8.00 USD }\n  - { min: 50, price: 6.00 USD }\n",
        )?;

        let product = fixture.try_into_product("widget".to_string())?;

        assert_eq!(product.rating, Decimal::new(485, 2));

        Ok(())
    }

    #[test]
    fn min_quantity_is_read_and_must_be_positive() -> TestResult {
        let tiers =
            "  - { min: 1, price: 10.00 USD }\n  - { min: 10, price: 8.00 USD }\n  - { min: 50, price: 6.00 USD }\n";

        let mut five = fixture(tiers)?;
        five.min_quantity = 5;

        assert_eq!(five.try_into_product("widget".to_string())?.min_order_quantity, 5);

        let mut zero = fixture(tiers)?;
        zero.min_quantity = 0;

        assert!(matches!(
            zero.try_into_product("widget".to_string()),
            Err(FixtureError::InvalidMinQuantity(ref product)) if product == "widget"
        ));

        Ok(())
    }

    #[test]
    fn parse_rating_rejects_non_numbers() {
        assert!(matches!(parse_rating("great"), Err(FixtureError::InvalidRating(_))));
        assert_eq!(parse_rating(" 3.10 ").ok(), Some(Decimal::new(310, 2)));
    }
}
