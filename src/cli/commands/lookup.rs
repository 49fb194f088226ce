//! Address and coordinate lookup commands.

use rust_decimal::Decimal;

use census_geocoder::{
    AddressQuery, CensusEntity, Config, EntityType, GeographyCollection, Geocoder, Location,
    LookupOptions,
};

use super::{OutputFormat, print_json};

/// Geocode one address
pub fn cmd_address(
    config: &Config,
    query: &AddressQuery,
    entity: EntityType,
    options: &LookupOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let geocoder = Geocoder::new(config)?;
    let location = geocoder.from_address(entity, query, options)?;
    print_location(&location, format)
}

/// Find the geographies containing a point
pub fn cmd_coordinates(
    config: &Config,
    longitude: Decimal,
    latitude: Decimal,
    options: &LookupOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let geocoder = Geocoder::new(config)?;
    let location = geocoder.from_coordinates(Some(longitude), Some(latitude), options)?;
    print_location(&location, format)
}

fn print_location(location: &Location, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&location.to_dict()),
        OutputFormat::Text => {
            for line in render_location(location) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

/// Human-readable summary of a lookup result.
pub(crate) fn render_location(location: &Location) -> Vec<String> {
    let mut lines = Vec::new();

    let input = location.input_address();
    let parts: Vec<&str> = ["address", "street", "city", "state", "zip"]
        .iter()
        .filter_map(|key| input.get(key).copied())
        .collect();
    if !parts.is_empty() {
        lines.push(format!("Input: {}", parts.join(", ")));
    }
    if let (Some(x), Some(y)) = (location.input_longitude(), location.input_latitude()) {
        lines.push(format!("Input: ({}, {})", x, y));
    }
    if let Some(name) = location.benchmark_name() {
        lines.push(format!(
            "Benchmark: {} ({})",
            name,
            location.benchmark().unwrap_or("?")
        ));
    }
    if let Some(name) = location.vintage_name() {
        lines.push(format!(
            "Vintage: {} ({})",
            name,
            location.vintage().unwrap_or("?")
        ));
    }

    for (i, matched) in location.matched_addresses().iter().enumerate() {
        lines.push(format!(
            "Match {}: {}",
            i + 1,
            matched.address().unwrap_or("(no address)")
        ));
        if let (Some(x), Some(y)) = (matched.longitude(), matched.latitude()) {
            lines.push(format!("  Coordinates: ({}, {})", x, y));
        }
        if let Some(id) = matched.tigerline_id() {
            lines.push(format!(
                "  TIGER/Line: {} side {}",
                id,
                matched.tigerline_side().unwrap_or("?")
            ));
        }
        render_geographies(matched.geographies(), "  ", &mut lines);
    }

    render_geographies(location.geographies(), "", &mut lines);
    lines
}

fn render_geographies(collection: &GeographyCollection, indent: &str, lines: &mut Vec<String>) {
    for (geography_type, areas) in collection.iter() {
        let names: Vec<String> = areas
            .iter()
            .map(|area| match (area.name(), area.geoid()) {
                (Some(name), Some(geoid)) => format!("{} [{}]", name, geoid),
                (Some(name), None) => name.to_string(),
                (None, Some(geoid)) => format!("[{}]", geoid),
                (None, None) => "?".to_string(),
            })
            .collect();
        lines.push(format!(
            "{}{}: {}",
            indent,
            geography_type.category(),
            names.join("; ")
        ));
    }
}
