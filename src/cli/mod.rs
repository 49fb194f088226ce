//! Command-line interface for census-geocoder.
//!
//! This module provides CLI commands for address, coordinate and batch
//! lookups, and for inspecting the effective configuration.

mod commands;

pub use commands::{Cli, run_command};
