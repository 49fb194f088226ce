//! Census Geocoder - command-line client for the US Census Bureau Geocoder.
//!
//! Looks up addresses, coordinates and batch files and prints the matches
//! and the Census geographies containing them.

mod cli;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so results on stdout stay clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("census_geocoder=info".parse()?))
        .init();

    let config = census_geocoder::config::load();
    cli::run_command(&args, &config)
}
