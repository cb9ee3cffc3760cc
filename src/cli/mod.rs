use std::{
    io,
    path::{Path, PathBuf},
};

use bulkrate::fixtures::Fixture;
use clap::{Parser, Subcommand};

mod access;
mod catalog;
mod inventory;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "bulkrate", about = "Bulkrate wholesale pricing CLI", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding fixture sets
    #[arg(long, global = true, env = "BULKRATE_FIXTURES", default_value = "./fixtures")]
    fixtures_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub(crate) log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search and sort a catalog
    Catalog(catalog::CatalogArgs),

    /// Price a cart
    Quote(quote::QuoteArgs),

    /// Show what a role may open
    Access(access::AccessArgs),

    /// Show stock levels
    Inventory(inventory::InventoryArgs),
}

impl Cli {
    pub(crate) fn run(self, out: impl io::Write) -> Result<(), String> {
        match self.command {
            Commands::Catalog(args) => catalog::run(&self.fixtures_dir, args, out),
            Commands::Quote(args) => quote::run(&self.fixtures_dir, &args, out),
            Commands::Access(args) => access::run(args, out),
            Commands::Inventory(args) => inventory::run(&self.fixtures_dir, &args, out),
        }
    }
}

fn load_fixture(fixtures_dir: &Path, name: &str) -> Result<Fixture, String> {
    let mut fixture = Fixture::with_base_path(fixtures_dir);

    fixture
        .load_catalog(name)
        .map_err(|error| format!("failed to load fixture set {name}: {error}"))?;

    Ok(fixture)
}
