//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `lookup`: one-line, parametrized and coordinate lookups
//! - `batch`: batch file lookups
//! - `settings`: resolved parameters and the config file

mod batch;
mod lookup;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

use census_geocoder::{Config, EntityType, LookupOptions};

pub use batch::cmd_batch;
pub use lookup::{cmd_address, cmd_coordinates};
pub use settings::{cmd_config, cmd_resolve};

/// Census Geocoder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Benchmark short code (CURRENT, TAB2020, CENSUS2020)
    #[arg(long, global = true)]
    pub benchmark: Option<String>,

    /// Vintage short code within the benchmark (CURRENT, CENSUS2020, ACS2019, ...)
    #[arg(long, global = true)]
    pub vintage: Option<String>,

    /// Comma-separated geography categories, or "all"
    #[arg(long, global = true)]
    pub layers: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Geocode an address
    Address {
        /// One-line address, e.g. "4600 Silver Hill Rd, Washington, DC 20233"
        one_line: Option<String>,
        /// Street address (used when no one-line address is given)
        #[arg(long)]
        street: Option<String>,
        /// City or town
        #[arg(long)]
        city: Option<String>,
        /// State or territory
        #[arg(long)]
        state: Option<String>,
        /// ZIP code
        #[arg(long)]
        zip: Option<String>,
        /// Include the geographies containing each match
        #[arg(long)]
        geographies: bool,
    },
    /// Find the geographies containing a point
    Coordinates {
        /// Longitude (x)
        #[arg(long, allow_negative_numbers = true)]
        longitude: Decimal,
        /// Latitude (y)
        #[arg(long, allow_negative_numbers = true)]
        latitude: Decimal,
    },
    /// Geocode a batch file (id, street, city, state, zip; no header)
    Batch {
        /// Path to the batch file
        file: Option<PathBuf>,
        /// Include the census block of each match
        #[arg(long)]
        geographies: bool,
    },
    /// Show the API parameters the lookup flags resolve to
    Resolve,
    /// Show the effective configuration
    Config {
        /// Save the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let options = cli.lookup_options();

    match &cli.command {
        Commands::Address {
            one_line,
            street,
            city,
            state,
            zip,
            geographies,
        } => {
            let query = census_geocoder::AddressQuery {
                one_line: one_line.clone(),
                street: street.clone(),
                city: city.clone(),
                state: state.clone(),
                zip_code: zip.clone(),
            };
            cmd_address(config, &query, entity_type(*geographies), &options, cli.format)
        }
        Commands::Coordinates {
            longitude,
            latitude,
        } => cmd_coordinates(config, *longitude, *latitude, &options, cli.format),
        Commands::Batch { file, geographies } => cmd_batch(
            config,
            file.as_deref(),
            entity_type(*geographies),
            &options,
            cli.format,
        ),
        Commands::Resolve => cmd_resolve(config, &options, cli.format),
        Commands::Config { write } => cmd_config(config, *write),
    }
}

impl Cli {
    /// Lookup overrides from the global flags.
    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions {
            benchmark: self.benchmark.clone(),
            vintage: self.vintage.clone(),
            layers: self.layers.clone(),
        }
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

fn entity_type(geographies: bool) -> EntityType {
    if geographies {
        EntityType::Geographies
    } else {
        EntityType::Locations
    }
}

/// Pretty-print a JSON value to stdout.
pub(crate) fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
