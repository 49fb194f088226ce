//! Configuration and parameter resolution commands.

use census_geocoder::geocoder::resolver;
use census_geocoder::{Config, LookupOptions, config};

use super::{OutputFormat, print_json};

/// Show the API parameters the lookup flags resolve to
pub fn cmd_resolve(
    config: &Config,
    options: &LookupOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let defaults = &config.defaults;
    let resolved = resolver::resolve(
        options.benchmark.as_deref().unwrap_or(&defaults.benchmark),
        options.vintage.as_deref().unwrap_or(&defaults.vintage),
        options.layers.as_deref().unwrap_or(&defaults.layers),
    )?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "benchmark": resolved.benchmark,
            "vintage": resolved.vintage,
            "layers": resolved.layers,
        })),
        OutputFormat::Text => {
            println!("Benchmark: {}", resolved.benchmark);
            println!("Vintage:   {}", resolved.vintage);
            if resolved.layers.is_empty() {
                println!("Layers:    (none)");
            } else {
                println!("Layers:    {}", resolved.layers);
            }
            Ok(())
        }
    }
}

/// Show, and optionally save, the effective configuration
pub fn cmd_config(config: &Config, write: bool) -> anyhow::Result<()> {
    if let Some(path) = config::config_path() {
        println!("# Config file: {}", path.display());
    }
    println!("{}", toml::to_string_pretty(config)?);

    if write {
        let path = config::save(config)?;
        println!("Saved configuration to {}", path.display());
    }
    Ok(())
}
