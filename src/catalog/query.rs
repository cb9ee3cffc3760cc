//! Catalog Queries

use std::{cmp::Reverse, str::FromStr};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{inventory::StockStatus, products::Product};

/// Errors parsing query options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Sort key name not recognised.
    #[error("unknown sort key: {0} (expected name, price-asc, price-desc or rating)")]
    UnknownSortKey(String),
}

/// Ordering applied to query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive name, A to Z.
    #[default]
    Name,

    /// Base unit price, cheapest first.
    PriceAscending,

    /// Base unit price, most expensive first.
    PriceDescending,

    /// Rating, highest first.
    RatingDescending,
}

impl SortKey {
    /// Sort `products` in place. All orderings are stable.
    pub fn apply(self, products: &mut [&Product<'_>]) {
        match self {
            Self::Name => products.sort_by_cached_key(|product| product.name.to_lowercase()),
            Self::PriceAscending => {
                products.sort_by_key(|product| product.base_price().to_minor_units());
            }
            Self::PriceDescending => {
                products.sort_by_key(|product| Reverse(product.base_price().to_minor_units()));
            }
            Self::RatingDescending => products.sort_by_key(|product| Reverse(product.rating)),
        }
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price-asc" | "price_ascending" => Ok(Self::PriceAscending),
            "price-desc" | "price_descending" => Ok(Self::PriceDescending),
            "rating" | "rating_descending" => Ok(Self::RatingDescending),
            other => Err(QueryError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Inclusive base-price bounds. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange<'a> {
    /// Lowest accepted base price
    pub min: Option<Money<'a, Currency>>,

    /// Highest accepted base price
    pub max: Option<Money<'a, Currency>>,
}

impl<'a> PriceRange<'a> {
    /// Create a range from optional bounds.
    pub fn new(min: Option<Money<'a, Currency>>, max: Option<Money<'a, Currency>>) -> Self {
        Self { min, max }
    }

    /// Check whether `price` lies within the range.
    pub fn contains(&self, price: &Money<'_, Currency>) -> bool {
        let minor = price.to_minor_units();

        self.min.is_none_or(|min| min.to_minor_units() <= minor)
            && self.max.is_none_or(|max| minor <= max.to_minor_units())
    }
}

/// Catalog filter and sort options. Every filter that is set must match.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery<'a> {
    search: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    price_range: Option<PriceRange<'a>>,
    stock_status: Option<StockStatus>,

    /// Result ordering
    pub sort: SortKey,
}

impl<'a> CatalogQuery<'a> {
    /// Create a query that matches everything, sorted by name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a case-insensitive substring of name, SKU or description.
    ///
    /// Empty text clears the filter; whitespace is matched as typed.
    #[must_use]
    pub fn search(mut self, text: &str) -> Self {
        self.search = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    /// Match an exact category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Match an exact brand.
    #[must_use]
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Match base prices within `range`.
    #[must_use]
    pub fn price_range(mut self, range: PriceRange<'a>) -> Self {
        self.price_range = Some(range);
        self
    }

    /// Match products in the given stock status; `Low` also lists critical products.
    ///
    /// Products without reorder levels never match.
    #[must_use]
    pub fn stock_status(mut self, status: StockStatus) -> Self {
        self.stock_status = Some(status);
        self
    }

    /// Order results by `sort`.
    #[must_use]
    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Check `product` against every filter.
    pub fn matches(&self, product: &Product<'_>) -> bool {
        self.matches_search(product)
            && self
                .category
                .as_ref()
                .is_none_or(|category| product.category == *category)
            && self
                .brand
                .as_ref()
                .is_none_or(|brand| product.brand.as_ref() == Some(brand))
            && self
                .price_range
                .is_none_or(|range| range.contains(product.base_price()))
            && self
                .stock_status
                .is_none_or(|filter| {
                    product
                        .stock_status()
                        .is_some_and(|status| filter.covers(status))
                })
    }

    fn matches_search(&self, product: &Product<'_>) -> bool {
        let Some(needle) = self.search.as_deref() else {
            return true;
        };

        [&product.name, &product.sku, &product.description]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{catalog::Catalog, inventory::StockLevels, tiers::TierTable};

    use super::*;

    fn catalog<'a>() -> TestResult<Catalog<'a>> {
        let mut catalog = Catalog::new(USD);

        for (id, name, category, brand, base, rating, stock) in [
            ("1", "Widget Pro X1", "Electronics", "Acme", 8999, 48, 150),
            ("2", "USB-C Cable 2 Meter", "Accessories", "Linko", 1299, 46, 500),
            ("3", "Power Bank 20000mAh", "Electronics", "Linko", 3999, 47, 75),
            ("4", "Basic Tool Kit", "Tools", "Acme", 2499, 43, 0),
            ("5", "bluetooth Speaker Mini", "Electronics", "Sonica", 2999, 45, 200),
            ("6", "Dual Monitor Arm", "Accessories", "Acme", 7999, 49, 45),
        ] {
            let tiers = TierTable::from_minor([(1, base), (10, base - 100), (50, base - 200)], USD)?;
            let product = Product::new(id, format!("SKU-{id}"), name, Money::from_minor(base + 1000, USD), tiers)
                .with_category(category)
                .with_brand(brand)
                .with_description(format!("{name} for professional use"))
                .with_rating(Decimal::new(rating, 1))
                .with_stock(stock, stock > 0)
                .with_stock_levels(StockLevels::new(50, 200));

            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    fn ids(products: &[&Product<'_>]) -> Vec<String> {
        products.iter().map(|product| product.id.clone()).collect()
    }

    #[test]
    fn default_query_sorts_by_name_case_insensitively() -> TestResult {
        let catalog = catalog()?;

        let products = catalog.filter_and_sort(&CatalogQuery::new());

        assert_eq!(ids(&products), ["4", "5", "6", "3", "2", "1"]);

        Ok(())
    }

    #[test]
    fn search_matches_name_sku_and_description() -> TestResult {
        let catalog = catalog()?;

        let by_name = catalog.filter_and_sort(&CatalogQuery::new().search("usb"));
        let by_sku = catalog.filter_and_sort(&CatalogQuery::new().search("sku-3"));
        let by_description = catalog.filter_and_sort(&CatalogQuery::new().search("PROFESSIONAL"));

        assert_eq!(ids(&by_name), ["2"]);
        assert_eq!(ids(&by_sku), ["3"]);
        assert_eq!(by_description.len(), 6);

        Ok(())
    }

    #[test]
    fn empty_search_matches_everything() -> TestResult {
        let catalog = catalog()?;

        let products = catalog.filter_and_sort(&CatalogQuery::new().search(""));

        assert_eq!(products.len(), 6);

        Ok(())
    }

    #[test]
    fn search_keeps_surrounding_whitespace() -> TestResult {
        let catalog = catalog()?;

        let trailing = catalog.filter_and_sort(&CatalogQuery::new().search("professional use "));
        let spaces = catalog.filter_and_sort(&CatalogQuery::new().search("   "));

        assert!(trailing.is_empty());
        assert!(spaces.is_empty());

        Ok(())
    }

    #[test]
    fn filters_are_conjunctive() -> TestResult {
        let catalog = catalog()?;

        let query = CatalogQuery::new()
            .category("Electronics")
            .brand("Linko")
            .sort(SortKey::PriceAscending);

        assert_eq!(ids(&catalog.filter_and_sort(&query)), ["3"]);

        let query = CatalogQuery::new().category("Accessories").brand("Sonica");

        assert!(catalog.filter_and_sort(&query).is_empty());

        Ok(())
    }

    #[test]
    fn price_range_is_inclusive() -> TestResult {
        let catalog = catalog()?;

        let range = PriceRange::new(
            Some(Money::from_minor(2499, USD)),
            Some(Money::from_minor(3999, USD)),
        );
        let query = CatalogQuery::new()
            .price_range(range)
            .sort(SortKey::PriceAscending);

        assert_eq!(ids(&catalog.filter_and_sort(&query)), ["4", "5", "3"]);

        Ok(())
    }

    #[test]
    fn sorts_by_price_and_rating() -> TestResult {
        let catalog = catalog()?;

        let descending = catalog.filter_and_sort(&CatalogQuery::new().sort(SortKey::PriceDescending));
        let rating = catalog.filter_and_sort(&CatalogQuery::new().sort(SortKey::RatingDescending));

        assert_eq!(ids(&descending), ["1", "6", "3", "5", "4", "2"]);
        assert_eq!(ids(&rating), ["6", "1", "3", "2", "5", "4"]);

        Ok(())
    }

    #[test]
    fn ties_keep_catalog_order() -> TestResult {
        let mut catalog = Catalog::new(USD);

        for id in ["b", "a", "c"] {
            let tiers = TierTable::from_minor([(1, 500), (10, 400), (50, 300)], USD)?;
            catalog.insert(Product::new(id, id, "Same", Money::from_minor(600, USD), tiers))?;
        }

        for sort in [
            SortKey::Name,
            SortKey::PriceAscending,
            SortKey::PriceDescending,
            SortKey::RatingDescending,
        ] {
            let products = catalog.filter_and_sort(&CatalogQuery::new().sort(sort));

            assert_eq!(ids(&products), ["b", "a", "c"], "{sort:?} should be stable");
        }

        Ok(())
    }

    #[test]
    fn stock_status_filter() -> TestResult {
        let catalog = catalog()?;

        let critical = catalog.filter_and_sort(&CatalogQuery::new().stock_status(StockStatus::Critical));
        let high = catalog.filter_and_sort(&CatalogQuery::new().stock_status(StockStatus::High));

        let low = catalog.filter_and_sort(&CatalogQuery::new().stock_status(StockStatus::Low));

        assert_eq!(ids(&critical), ["4", "6"]);
        assert_eq!(ids(&high), ["5", "2"]);
        assert_eq!(ids(&low), ["4", "6", "3"]);

        Ok(())
    }

    #[test]
    fn repeated_queries_return_the_same_results() -> TestResult {
        let catalog = catalog()?;
        let query = CatalogQuery::new().search("e").sort(SortKey::RatingDescending);

        assert_eq!(
            ids(&catalog.filter_and_sort(&query)),
            ids(&catalog.filter_and_sort(&query))
        );

        Ok(())
    }

    #[test]
    fn sort_key_from_str() {
        assert_eq!("price-asc".parse(), Ok(SortKey::PriceAscending));
        assert_eq!("rating".parse(), Ok(SortKey::RatingDescending));
        assert_eq!(
            "cheapest".parse::<SortKey>(),
            Err(QueryError::UnknownSortKey("cheapest".to_string()))
        );
    }
}
