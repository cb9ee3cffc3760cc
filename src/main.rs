//! Bulkrate CLI

use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

mod cli;

/// Bulkrate CLI entry point
pub fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    ExitCode::from(report(cli.run(io::stdout().lock()), io::stderr().lock()))
}

/// Writes a failed command's message to `err` and returns the process status.
fn report(result: Result<(), String>, mut err: impl io::Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(message) => {
            _ = writeln!(err, "{message}");

            1
        }
    }
}
