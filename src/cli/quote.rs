use std::{io, path::Path};

use bulkrate::receipt::Receipt;
use clap::Args;
use tracing::info;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Fixture set name
    #[arg(long, default_value = "wholesale")]
    fixture: String,

    /// Line to add, as `<product id>[=<quantity>]`; repeat for more lines.
    /// Without a quantity the product's minimum order is added.
    #[arg(long = "add", value_name = "ID[=QTY]", required = true, value_parser = parse_line)]
    lines: Vec<(String, Option<i64>)>,
}

pub(crate) fn run(
    fixtures_dir: &Path,
    args: &QuoteArgs,
    out: impl io::Write,
) -> Result<(), String> {
    let fixture = super::load_fixture(fixtures_dir, &args.fixture)?;
    let mut cart = fixture.cart().map_err(|error| error.to_string())?;

    for (product_id, quantity) in &args.lines {
        match quantity {
            Some(quantity) => cart
                .add(product_id, *quantity)
                .map_err(|error| format!("cannot add {quantity} x {product_id}: {error}"))?,
            None => cart
                .add_minimum(product_id)
                .map_err(|error| format!("cannot add {product_id}: {error}"))?,
        };
    }

    let receipt = Receipt::from_cart(&cart).map_err(|error| error.to_string())?;

    info!(
        lines = receipt.lines().len(),
        items = receipt.item_count(),
        total = %receipt.total(),
        "priced cart"
    );

    receipt.write_to(out).map_err(|error| error.to_string())
}

fn parse_line(s: &str) -> Result<(String, Option<i64>), String> {
    let (product_id, quantity) = match s.split_once('=') {
        Some((product_id, quantity)) => {
            let quantity = quantity
                .trim()
                .parse()
                .map_err(|error| format!("invalid quantity in {s}: {error}"))?;

            (product_id.trim(), Some(quantity))
        }
        None => (s.trim(), None),
    };

    if product_id.is_empty() {
        return Err(format!("expected ID[=QTY], got {s}"));
    }

    Ok((product_id.to_string(), quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_splits_id_and_quantity() {
        assert_eq!(parse_line("widget=10"), Ok(("widget".to_string(), Some(10))));
        assert_eq!(
            parse_line(" widget = -2 "),
            Ok(("widget".to_string(), Some(-2)))
        );
    }

    #[test]
    fn parse_line_without_quantity_uses_minimum_order() {
        assert_eq!(parse_line("widget"), Ok(("widget".to_string(), None)));
    }

    #[test]
    fn parse_line_rejects_malformed_input() {
        assert!(parse_line("").is_err());
        assert!(parse_line("=3").is_err());
        assert!(parse_line("widget=ten").is_err());
        assert!(parse_line("widget=2.5").is_err());
    }
}
