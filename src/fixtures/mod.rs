//! Fixtures
//!
//! Catalog fixture sets are YAML files under `<base>/catalogs/<name>.yml` holding the cart
//! policy and a map of product id to product definition.

use std::{collections::BTreeMap, fs, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartPolicy},
    catalog::{Catalog, CatalogError},
    fixtures::products::ProductFixture,
    tiers::TierError,
};

pub mod products;

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

    /// Invalid rating
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    /// Minimum order quantity of zero
    #[error("Minimum order quantity for product {0} must be at least 1")]
    InvalidMinQuantity(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Misconfigured pricing tiers
    #[error("Invalid pricing tiers for product {product}: {source}")]
    Tiers {
        /// Product id
        product: String,

        /// Underlying tier error
        source: TierError,
    },

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The fixture set defines no products
    #[error("No products defined; catalog currency unknown")]
    NoProducts,

    /// No catalog loaded yet
    #[error("No catalog loaded")]
    NoCatalog,
}

/// Catalog fixture file
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Cart policy
    #[serde(default)]
    pub cart: CartPolicy,

    /// Map of product id -> product fixture
    pub products: BTreeMap<String, ProductFixture>,
}

impl CatalogFixture {
    /// Build a catalog, in product id order.
    ///
    /// # Errors
    ///
    /// Returns an error if any product is invalid, if currencies are mixed, or if there are
    /// no products.
    pub fn try_into_catalog(self) -> Result<Catalog<'static>, FixtureError> {
        let products = self
            .products
            .into_iter()
            .map(|(id, fixture)| fixture.try_into_product(id))
            .collect::<Result<Vec<_>, _>>()?;

        let currency = products
            .first()
            .map(|product| product.list_price.currency())
            .ok_or(FixtureError::NoProducts)?;

        let mut catalog = Catalog::new(currency);

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded catalog
    catalog: Option<Catalog<'static>>,

    /// Cart policy from the loaded set
    policy: CartPolicy,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            policy: CartPolicy::default(),
        }
    }

    /// Load a catalog and cart policy from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the catalog is invalid.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        self.policy = fixture.cart;

        let catalog = fixture.try_into_catalog()?;

        debug!(
            path = %file_path.display(),
            products = catalog.len(),
            "loaded catalog fixture"
        );

        self.catalog = Some(catalog);

        Ok(self)
    }

    /// Load a fixture set by name from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture set cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded.
    pub fn catalog(&self) -> Result<&Catalog<'static>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Get the cart policy
    pub fn policy(&self) -> CartPolicy {
        self.policy
    }

    /// Create an empty cart over the loaded catalog, using the fixture's policy
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded.
    pub fn cart(&self) -> Result<Cart<'_, 'static>, FixtureError> {
        Ok(Cart::with_policy(self.catalog()?, self.policy))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rusty_money::iso::{GBP, USD};
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::cart::BackorderPolicy;

    use super::*;

    const TIERS: &str = "    tiers:\n      - { min: 1, price: 10.00 USD }\n      - { min: 10, price: 8.00 USD }\n      - { min: 50, price: 6.00 USD }\n";

    fn write_fixture(base: &Path, name: &str, contents: &str) -> TestResult {
        let dir = base.join("catalogs");

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    fn product_yaml(id: &str, price: &str) -> String {
        format!(
            "  {id}:\n    sku: {id}\n    name: {id}\n    category: Parts\n    list_price: {price}\n    stock: 3\n{TIERS}"
        )
    }

    #[test]
    fn load_catalog_reads_products_and_policy() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "small",
            &format!(
                "cart:\n  backorder: allow\nproducts:\n{}{}",
                product_yaml("b", "12.00 USD"),
                product_yaml("a", "11.00 USD")
            ),
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("small")?;

        let catalog = fixture.catalog()?;
        let ids: Vec<&str> = catalog.iter().map(|(_, p)| p.id.as_str()).collect();

        assert_eq!(ids, ["a", "b"]);
        assert_eq!(catalog.currency(), USD);
        assert_eq!(fixture.policy().backorder, BackorderPolicy::Allow);

        Ok(())
    }

    #[test]
    fn load_catalog_defaults_policy_to_reject() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "small",
            &format!("products:\n{}", product_yaml("a", "11.00 USD")),
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("small")?;

        assert_eq!(fixture.policy(), CartPolicy::default());
        assert_eq!(fixture.cart()?.policy().backorder, BackorderPolicy::Reject);

        Ok(())
    }

    #[test]
    fn load_catalog_rejects_mixed_currencies() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "mixed",
            &format!(
                "products:\n{}{}",
                product_yaml("a", "11.00 USD"),
                product_yaml("b", "12.00 GBP")
            ),
        )?;

        let result = Fixture::with_base_path(dir.path())
            .load_catalog("mixed")
            .map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::Catalog(CatalogError::CurrencyMismatch(ref id, code, _)))
                if id == "b" && code == GBP.iso_alpha_code
        ));

        Ok(())
    }

    #[test]
    fn load_catalog_rejects_empty_sets() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "empty", "products: {}\n")?;

        let result = Fixture::with_base_path(dir.path())
            .load_catalog("empty")
            .map(|_| ());

        assert!(matches!(result, Err(FixtureError::NoProducts)));

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Fixture::with_base_path("./does-not-exist")
            .load_catalog("nothing")
            .map(|_| ());

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }

    #[test]
    fn catalog_before_load_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.catalog(), Err(FixtureError::NoCatalog)));
        assert!(matches!(fixture.cart(), Err(FixtureError::NoCatalog)));
    }

    #[test]
    fn from_set_loads_wholesale_fixture() -> TestResult {
        let fixture = Fixture::from_set("wholesale")?;

        assert_eq!(fixture.catalog()?.len(), 8);

        Ok(())
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
        assert!(fixture.catalog.is_none());
    }
}
