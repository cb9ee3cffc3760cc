use std::{io, path::Path};

use bulkrate::{
    catalog::{CatalogQuery, PriceRange, SortKey},
    fixtures::products::parse_price,
    inventory::StockStatus,
    receipt::write_table,
};
use clap::Args;
use rusty_money::{Money, iso::Currency};
use tabled::{builder::Builder, settings::object::Columns};

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Fixture set name
    #[arg(long, default_value = "wholesale")]
    fixture: String,

    /// Match name, SKU or description (case-insensitive)
    #[arg(long)]
    search: Option<String>,

    /// Exact category
    #[arg(long)]
    category: Option<String>,

    /// Exact brand
    #[arg(long)]
    brand: Option<String>,

    /// Lowest base unit price, in the catalog's currency (e.g. 10.00)
    #[arg(long)]
    min_price: Option<String>,

    /// Highest base unit price, in the catalog's currency
    #[arg(long)]
    max_price: Option<String>,

    /// Stock status (critical, low, normal, high)
    #[arg(long)]
    stock: Option<StockStatus>,

    /// Sort order (name, price-asc, price-desc, rating)
    #[arg(long, default_value = "name")]
    sort: SortKey,
}

pub(crate) fn run(
    fixtures_dir: &Path,
    args: CatalogArgs,
    mut out: impl io::Write,
) -> Result<(), String> {
    let fixture = super::load_fixture(fixtures_dir, &args.fixture)?;
    let catalog = fixture.catalog().map_err(|error| error.to_string())?;
    let currency = catalog.currency();

    let mut query = CatalogQuery::new().sort(args.sort).price_range(PriceRange::new(
        price_arg(args.min_price.as_deref(), currency)?,
        price_arg(args.max_price.as_deref(), currency)?,
    ));

    if let Some(search) = &args.search {
        query = query.search(search);
    }

    if let Some(category) = args.category {
        query = query.category(category);
    }

    if let Some(brand) = args.brand {
        query = query.brand(brand);
    }

    if let Some(status) = args.stock {
        query = query.stock_status(status);
    }

    let products = catalog.filter_and_sort(&query);

    let mut builder = Builder::default();

    builder.push_record([
        "Id", "SKU", "Name", "Category", "Rating", "Stock", "Min", "List", "Tier 1", "Tier 2",
        "Tier 3",
    ]);

    for product in &products {
        let mut record = vec![
            product.id.clone(),
            product.sku.clone(),
            product.name.clone(),
            product.category.clone(),
            product.rating.to_string(),
            if product.available {
                product.stock.to_string()
            } else {
                "out of stock".to_string()
            },
            product.min_order_quantity.to_string(),
            product.list_price.to_string(),
        ];

        record.extend(
            product
                .tiers
                .tiers()
                .iter()
                .map(|tier| format!("{}+ {}", tier.minimum_quantity(), tier.unit_price())),
        );

        builder.push_record(record);
    }

    write_table(&mut out, builder, Columns::new(4..11)).map_err(|error| error.to_string())?;

    writeln!(out, " {} of {} products", products.len(), catalog.len())
        .map_err(|error| error.to_string())
}

fn price_arg(
    amount: Option<&str>,
    currency: &'static Currency,
) -> Result<Option<Money<'static, Currency>>, String> {
    amount
        .map(|amount| {
            let (minor, currency) = parse_price(&format!("{amount} {}", currency.iso_alpha_code))
                .map_err(|error| error.to_string())?;

            Ok(Money::from_minor(minor, currency))
        })
        .transpose()
}
