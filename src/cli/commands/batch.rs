//! Batch lookup command.

use std::path::Path;

use serde_json::Value;

use census_geocoder::{CensusEntity, Config, EntityType, Geocoder, Location, LookupOptions};

use super::{OutputFormat, print_json};

/// Geocode every address in a batch file
pub fn cmd_batch(
    config: &Config,
    file: Option<&Path>,
    entity: EntityType,
    options: &LookupOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let geocoder = Geocoder::new(config)?;
    let locations = geocoder.from_batch(entity, file, options)?;

    match format {
        OutputFormat::Json => print_json(&Value::Array(
            locations.iter().map(batch_entry).collect(),
        )),
        OutputFormat::Text => {
            for line in render_batch(&locations) {
                println!("{}", line);
            }
            let matched = locations
                .iter()
                .filter(|l| !l.matched_addresses().is_empty())
                .count();
            println!("\n{} of {} addresses matched.", matched, locations.len());
            Ok(())
        }
    }
}

/// A batch row as JSON: its id, match status and the parsed location.
fn batch_entry(location: &Location) -> Value {
    serde_json::json!({
        "id": location.batch_id(),
        "match": location.match_indicator(),
        "matchType": location.match_type(),
        "location": location.to_dict(),
    })
}

/// One tab-separated line per batch row.
fn render_batch(locations: &[Location]) -> Vec<String> {
    locations
        .iter()
        .map(|location| {
            let matched = location.matched_addresses().first();
            let coordinates = matched
                .and_then(|m| Some(format!("{},{}", m.longitude()?, m.latitude()?)))
                .unwrap_or_default();
            let block = matched
                .and_then(|m| m.geographies().areas().next())
                .and_then(|area| area.geoid())
                .unwrap_or_default();
            [
                location.batch_id().unwrap_or_default(),
                location.match_indicator().unwrap_or_default(),
                matched.and_then(|m| m.address()).unwrap_or_default(),
                coordinates.as_str(),
                block,
            ]
            .join("\t")
            .trim_end()
            .to_string()
        })
        .collect()
}
