use std::{io, path::Path};

use bulkrate::{inventory::InventorySummary, receipt::write_table};
use clap::Args;
use tabled::{builder::Builder, settings::object::Columns};

#[derive(Debug, Args)]
pub(crate) struct InventoryArgs {
    /// Fixture set name
    #[arg(long, default_value = "wholesale")]
    fixture: String,
}

pub(crate) fn run(
    fixtures_dir: &Path,
    args: &InventoryArgs,
    mut out: impl io::Write,
) -> Result<(), String> {
    let fixture = super::load_fixture(fixtures_dir, &args.fixture)?;
    let catalog = fixture.catalog().map_err(|error| error.to_string())?;

    let mut builder = Builder::default();

    builder.push_record(["SKU", "Name", "Category", "Stock", "Min", "Max", "Status"]);

    for (_, product) in catalog.iter() {
        let (min, max) = product
            .stock_levels
            .map_or((String::new(), String::new()), |levels| {
                (levels.min.to_string(), levels.max.to_string())
            });

        let status = match (product.available, product.stock_status()) {
            (false, _) => "unavailable".to_string(),
            (true, Some(status)) => status.to_string(),
            (true, None) => String::new(),
        };

        builder.push_record([
            product.sku.clone(),
            product.name.clone(),
            product.category.clone(),
            product.stock.to_string(),
            min,
            max,
            status,
        ]);
    }

    write_table(&mut out, builder, Columns::new(3..6)).map_err(|error| error.to_string())?;

    let summary = InventorySummary::from_catalog(catalog);

    writeln!(
        out,
        " {} products in {} categories, {} units in stock",
        summary.products, summary.categories, summary.units
    )
    .map_err(|error| error.to_string())?;

    writeln!(
        out,
        " {} at or below minimum, {} critical, {} unavailable",
        summary.below_minimum, summary.critical, summary.unavailable
    )
    .map_err(|error| error.to_string())
}
