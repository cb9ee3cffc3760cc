//! Catalog
//!
//! The read-only collection of purchasable products. Products are stored in a `SlotMap`
//! and indexed by their string identifier; iteration follows insertion order.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey};

pub mod query;

pub use query::{CatalogQuery, PriceRange, QueryError, SortKey};

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A product with this identifier already exists.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),

    /// A product's currency differs from the catalog currency (id, product currency, catalog currency).
    #[error("product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Catalog
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    ids: FxHashMap<String, ProductKey>,
    currency: &'a Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in `currency`.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            ids: FxHashMap::default(),
            currency,
        }
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the identifier is already taken or the product is priced
    /// in a different currency.
    pub fn insert(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let mismatch = [product.list_price.currency(), product.tiers.currency()]
            .into_iter()
            .find(|currency| *currency != self.currency)
            .map(|currency| currency.iso_alpha_code);

        if let Some(code) = mismatch {
            return Err(CatalogError::CurrencyMismatch(
                product.id,
                code,
                self.currency.iso_alpha_code,
            ));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.ids.insert(id, key);

        Ok(key)
    }

    /// Get a product by key.
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Get the key for a product identifier.
    pub fn key(&self, id: &str) -> Option<ProductKey> {
        self.ids.get(id).copied()
    }

    /// Find a product by identifier.
    pub fn find(&self, id: &str) -> Option<(ProductKey, &Product<'a>)> {
        let key = self.key(id)?;

        self.products.get(key).map(|product| (key, product))
    }

    /// Iterate over products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.products.iter()
    }

    /// Sorted, de-duplicated category names.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .products
            .values()
            .map(|product| product.category.as_str())
            .collect();

        categories.sort_unstable();
        categories.dedup();

        categories
    }

    /// Filter products with `query` and order them by its sort key.
    ///
    /// Sorting is stable, so products that tie on the sort key keep catalog order.
    pub fn filter_and_sort(&self, query: &CatalogQuery<'_>) -> Vec<&Product<'a>> {
        let mut products: Vec<&Product<'a>> = self
            .products
            .values()
            .filter(|product| query.matches(product))
            .collect();

        query.sort.apply(&mut products);

        products
    }

    /// Get the catalog currency.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Get the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
