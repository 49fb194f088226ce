//! The result of one geocoder lookup.
//!
//! A [`Location`] echoes the input the service received (address parts or
//! coordinates, benchmark, vintage) and carries what it found: matched
//! addresses for address lookups, a [`GeographyCollection`] for coordinate
//! lookups.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use super::address::{CSV_MATCH_COLUMNS, MatchedAddress};
use super::coerce;
use super::collection::GeographyCollection;
use super::{CensusEntity, FromWire, ModelError};
use crate::geocoder::resolver;

/// Keys under `result` the model reads itself.
const RESULT_KEYS: &[&str] = &["input", "addressMatches", "geographies", "batch"];

/// Batch rows carry at least an id and the submitted address.
const CSV_MIN_COLUMNS: usize = 2;

/// One geocoder lookup result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    input_one_line: Option<String>,
    input_street: Option<String>,
    input_city: Option<String>,
    input_state: Option<String>,
    input_zip_code: Option<String>,
    input_longitude: Option<Decimal>,
    input_latitude: Option<Decimal>,
    benchmark_name: Option<String>,
    benchmark_description: Option<String>,
    benchmark_id: Option<String>,
    benchmark_is_default: bool,
    vintage_name: Option<String>,
    vintage_description: Option<String>,
    vintage_id: Option<String>,
    vintage_is_default: bool,
    matched_addresses: Vec<MatchedAddress>,
    geographies: GeographyCollection,
    batch_id: Option<String>,
    match_indicator: Option<String>,
    match_type: Option<String>,
    extensions: Map<String, Value>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    text_accessors! {
        input_one_line, set_input_one_line;
        input_street, set_input_street;
        input_city, set_input_city;
        input_state, set_input_state;
        input_zip_code, set_input_zip_code;
        benchmark_name, set_benchmark_name;
        benchmark_description, set_benchmark_description;
        benchmark_id, set_benchmark_id;
        vintage_name, set_vintage_name;
        vintage_description, set_vintage_description;
        vintage_id, set_vintage_id;
    }

    pub fn input_longitude(&self) -> Option<Decimal> {
        self.input_longitude
    }

    pub fn set_input_longitude(&mut self, value: impl Into<Value>) -> Result<(), ModelError> {
        self.input_longitude = coerce::decimal("input_longitude", &value.into())?;
        Ok(())
    }

    pub fn input_latitude(&self) -> Option<Decimal> {
        self.input_latitude
    }

    pub fn set_input_latitude(&mut self, value: impl Into<Value>) -> Result<(), ModelError> {
        self.input_latitude = coerce::decimal("input_latitude", &value.into())?;
        Ok(())
    }

    pub fn benchmark_is_default(&self) -> bool {
        self.benchmark_is_default
    }

    pub fn set_benchmark_is_default(&mut self, value: bool) {
        self.benchmark_is_default = value;
    }

    pub fn vintage_is_default(&self) -> bool {
        self.vintage_is_default
    }

    pub fn set_vintage_is_default(&mut self, value: bool) {
        self.vintage_is_default = value;
    }

    /// Short code of the benchmark used (`CURRENT`, `CENSUS2020`, ...).
    pub fn benchmark(&self) -> Option<&'static str> {
        self.benchmark_name.as_deref().and_then(resolver::benchmark_code)
    }

    /// Short code of the vintage used, within [`Location::benchmark`].
    pub fn vintage(&self) -> Option<&'static str> {
        let vintage_name = self.vintage_name.as_deref()?;
        resolver::vintage_code(self.benchmark_name.as_deref(), vintage_name)
    }

    /// The submitted address parts that are set, keyed by wire name.
    pub fn input_address(&self) -> BTreeMap<&'static str, &str> {
        [
            ("address", &self.input_one_line),
            ("street", &self.input_street),
            ("city", &self.input_city),
            ("state", &self.input_state),
            ("zip", &self.input_zip_code),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }

    pub fn matched_addresses(&self) -> &[MatchedAddress] {
        &self.matched_addresses
    }

    pub fn set_matched_addresses(&mut self, matches: Vec<MatchedAddress>) {
        self.matched_addresses = matches;
    }

    pub fn push_matched_address(&mut self, matched: MatchedAddress) {
        self.matched_addresses.push(matched);
    }

    /// Geographies of a coordinate lookup.
    pub fn geographies(&self) -> &GeographyCollection {
        &self.geographies
    }

    pub fn set_geographies(&mut self, geographies: GeographyCollection) {
        self.geographies = geographies;
    }

    /// Record id of a batch row.
    pub fn batch_id(&self) -> Option<&str> {
        self.batch_id.as_deref()
    }

    /// `Match`, `No_Match` or `Tie` for a batch row.
    pub fn match_indicator(&self) -> Option<&str> {
        self.match_indicator.as_deref()
    }

    /// `Exact` or `Non_Exact` for a matched batch row.
    pub fn match_type(&self) -> Option<&str> {
        self.match_type.as_deref()
    }

    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }
}

fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&Value::Null)
}

fn insert_text(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if value.is_some() {
        map.insert(key.to_string(), coerce::emit_text(value));
    }
}

impl FromWire for Location {
    /// Parse from the `{"result": {...}}` envelope returned by the service.
    fn from_dict(value: &Value) -> Result<Self, ModelError> {
        if !value.is_object() && !value.is_null() {
            return Err(ModelError::NotAnObject("Location".to_string()));
        }
        let result = field(value, "result");
        let input = field(result, "input");

        let mut location = Self::new();
        let address = field(input, "address");
        location.input_one_line = coerce::text("input_one_line", field(address, "address"))?;
        location.input_street = coerce::text("input_street", field(address, "street"))?;
        location.input_city = coerce::text("input_city", field(address, "city"))?;
        location.input_state = coerce::text("input_state", field(address, "state"))?;
        location.input_zip_code = coerce::text("input_zip_code", field(address, "zip"))?;

        let point = field(input, "location");
        location.input_longitude = coerce::decimal("input_longitude", field(point, "x"))?;
        location.input_latitude = coerce::decimal("input_latitude", field(point, "y"))?;

        let benchmark = field(input, "benchmark");
        location.benchmark_id = coerce::text("benchmark_id", field(benchmark, "id"))?;
        location.benchmark_name = coerce::text("benchmark_name", field(benchmark, "benchmarkName"))?;
        location.benchmark_description = coerce::text(
            "benchmark_description",
            field(benchmark, "benchmarkDescription"),
        )?;
        location.benchmark_is_default =
            coerce::flag("benchmark_is_default", field(benchmark, "isDefault"))?.unwrap_or(false);

        let vintage = field(input, "vintage");
        location.vintage_id = coerce::text("vintage_id", field(vintage, "id"))?;
        location.vintage_name = coerce::text("vintage_name", field(vintage, "vintageName"))?;
        location.vintage_description =
            coerce::text("vintage_description", field(vintage, "vintageDescription"))?;
        location.vintage_is_default =
            coerce::flag("vintage_is_default", field(vintage, "isDefault"))?.unwrap_or(false);

        match field(result, "addressMatches") {
            Value::Null => {}
            Value::Array(matches) => {
                for element in matches {
                    let envelope = json!({ "result": { "addressMatches": element } });
                    location
                        .matched_addresses
                        .push(MatchedAddress::from_dict(&envelope)?);
                }
            }
            _ => {
                return Err(ModelError::invalid(
                    "addressMatches",
                    "expected a list of matches",
                ));
            }
        }

        location.geographies = GeographyCollection::from_dict(field(result, "geographies"))?;

        let batch = field(result, "batch");
        location.batch_id = coerce::text("batch_id", field(batch, "id"))?;
        location.match_indicator = coerce::text("match_indicator", field(batch, "match"))?;
        location.match_type = coerce::text("match_type", field(batch, "matchType"))?;

        if let Some(result) = result.as_object() {
            for (key, value) in result {
                if !RESULT_KEYS.contains(&key.as_str()) {
                    location.extensions.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(location)
    }

    /// Build from a batch response row. Rows without a match yield a
    /// location with no matched addresses.
    fn from_csv_record(record: &[String]) -> Result<Self, ModelError> {
        if record.len() < CSV_MIN_COLUMNS {
            return Err(ModelError::ShortRecord {
                expected: CSV_MIN_COLUMNS,
                actual: record.len(),
            });
        }

        let cell = |index: usize| -> Result<Option<String>, ModelError> {
            match record.get(index) {
                Some(raw) => coerce::text("batch column", &Value::from(raw.trim())),
                None => Ok(None),
            }
        };

        let mut location = Self::new();
        location.batch_id = cell(0)?;
        location.input_one_line = cell(1)?;
        location.match_indicator = cell(2)?;
        location.match_type = cell(3)?;

        if record.len() >= CSV_MATCH_COLUMNS && !record[4].trim().is_empty() {
            location
                .matched_addresses
                .push(MatchedAddress::from_csv_record(record)?);
        }
        Ok(location)
    }
}

impl CensusEntity for Location {
    fn entity_type(&self) -> &'static str {
        "locations"
    }

    fn to_dict(&self) -> Value {
        let mut address = Map::new();
        insert_text(&mut address, "address", &self.input_one_line);
        insert_text(&mut address, "street", &self.input_street);
        insert_text(&mut address, "city", &self.input_city);
        insert_text(&mut address, "state", &self.input_state);
        insert_text(&mut address, "zip", &self.input_zip_code);

        let mut input = Map::new();
        if !address.is_empty() {
            input.insert("address".into(), Value::Object(address));
        }
        if self.input_longitude.is_some() || self.input_latitude.is_some() {
            input.insert(
                "location".into(),
                json!({
                    "x": coerce::emit_decimal(&self.input_longitude),
                    "y": coerce::emit_decimal(&self.input_latitude),
                }),
            );
        }
        input.insert(
            "benchmark".into(),
            json!({
                "id": coerce::emit_text(&self.benchmark_id),
                "benchmarkName": coerce::emit_text(&self.benchmark_name),
                "benchmarkDescription": coerce::emit_text(&self.benchmark_description),
                "isDefault": self.benchmark_is_default,
            }),
        );
        input.insert(
            "vintage".into(),
            json!({
                "id": coerce::emit_text(&self.vintage_id),
                "vintageName": coerce::emit_text(&self.vintage_name),
                "vintageDescription": coerce::emit_text(&self.vintage_description),
                "isDefault": self.vintage_is_default,
            }),
        );

        let mut result = Map::new();
        result.insert("input".into(), Value::Object(input));
        if !self.matched_addresses.is_empty() || self.geographies.is_empty() {
            result.insert(
                "addressMatches".into(),
                Value::Array(
                    self.matched_addresses
                        .iter()
                        .map(MatchedAddress::to_match)
                        .collect(),
                ),
            );
        }
        if !self.geographies.is_empty() || !self.geographies.extensions().is_empty() {
            result.insert("geographies".into(), self.geographies.to_dict());
        }
        if self.batch_id.is_some() || self.match_indicator.is_some() || self.match_type.is_some() {
            result.insert(
                "batch".into(),
                json!({
                    "id": coerce::emit_text(&self.batch_id),
                    "match": coerce::emit_text(&self.match_indicator),
                    "matchType": coerce::emit_text(&self.match_type),
                }),
            );
        }
        for (key, value) in &self.extensions {
            result.insert(key.clone(), value.clone());
        }
        json!({ "result": result })
    }

    fn inspect(&self, as_census_fields: bool) -> Vec<String> {
        let fields: [(&str, &str, bool); 18] = [
            ("input_one_line", "address", self.input_one_line.is_some()),
            ("input_street", "street", self.input_street.is_some()),
            ("input_city", "city", self.input_city.is_some()),
            ("input_state", "state", self.input_state.is_some()),
            ("input_zip_code", "zip", self.input_zip_code.is_some()),
            ("input_longitude", "x", self.input_longitude.is_some()),
            ("input_latitude", "y", self.input_latitude.is_some()),
            ("benchmark_id", "id", self.benchmark_id.is_some()),
            ("benchmark_name", "benchmarkName", self.benchmark_name.is_some()),
            (
                "benchmark_description",
                "benchmarkDescription",
                self.benchmark_description.is_some(),
            ),
            ("vintage_id", "id", self.vintage_id.is_some()),
            ("vintage_name", "vintageName", self.vintage_name.is_some()),
            (
                "vintage_description",
                "vintageDescription",
                self.vintage_description.is_some(),
            ),
            (
                "matched_addresses",
                "addressMatches",
                !self.matched_addresses.is_empty(),
            ),
            ("geographies", "geographies", !self.geographies.is_empty()),
            ("batch_id", "id", self.batch_id.is_some()),
            ("match_indicator", "match", self.match_indicator.is_some()),
            ("match_type", "matchType", self.match_type.is_some()),
        ];
        let mut names: Vec<String> = fields
            .iter()
            .filter(|(_, _, populated)| *populated)
            .map(|(name, wire, _)| (if as_census_fields { wire } else { name }).to_string())
            .collect();
        if !as_census_fields {
            if self.benchmark().is_some() {
                names.push("benchmark".to_string());
            }
            if self.vintage().is_some() {
                names.push("vintage".to_string());
            }
        }
        names.extend(self.extensions.keys().cloned());
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        address_geographies_response, coordinates_geographies_response, one_line_locations_response,
    };
    use std::str::FromStr;

    fn csv_row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_empty_dict() {
        let location = Location::from_dict(&json!({})).unwrap();
        assert_eq!(location, Location::new());
        assert!(location.matched_addresses().is_empty());
        assert_eq!(location.benchmark(), None);
    }

    #[test]
    fn test_one_line_response() {
        let location = Location::from_dict(&one_line_locations_response()).unwrap();
        assert_eq!(
            location.input_one_line(),
            Some("4600 Silver Hill Rd, Washington, DC 20233")
        );
        assert_eq!(location.benchmark_name(), Some("Public_AR_Current"));
        assert_eq!(location.benchmark_id(), Some("4"));
        assert!(location.benchmark_is_default());
        assert_eq!(location.benchmark(), Some("CURRENT"));
        assert_eq!(location.matched_addresses().len(), 1);
        assert_eq!(location.matched_addresses()[0].zip_code(), Some("20233"));
    }

    #[test]
    fn test_vintage_short_code() {
        let location = Location::from_dict(&address_geographies_response()).unwrap();
        assert_eq!(location.vintage_name(), Some("Current_Current"));
        assert_eq!(location.vintage(), Some("CURRENT"));
        assert_eq!(location.benchmark(), Some("CURRENT"));
        assert!(!location.matched_addresses()[0].geographies().is_empty());
    }

    #[test]
    fn test_short_codes_are_recomputed() {
        let mut location = Location::new();
        location.set_benchmark_name("Public_AR_Census2020").unwrap();
        location.set_vintage_name("Census2010_Census2020").unwrap();
        assert_eq!(location.benchmark(), Some("CENSUS2020"));
        assert_eq!(location.vintage(), Some("CENSUS2010"));

        location.set_benchmark_name("Public_AR_Unknown").unwrap();
        assert_eq!(location.benchmark(), None);
    }

    #[test]
    fn test_coordinates_response() {
        let location = Location::from_dict(&coordinates_geographies_response()).unwrap();
        assert_eq!(
            location.input_longitude(),
            Some(Decimal::from_str("-76.92744").unwrap())
        );
        assert!(location.matched_addresses().is_empty());
        assert!(!location.geographies().is_empty());
        assert_eq!(location.geographies().counties().len(), 1);
    }

    #[test]
    fn test_round_trips() {
        for payload in [
            one_line_locations_response(),
            address_geographies_response(),
            coordinates_geographies_response(),
        ] {
            let location = Location::from_dict(&payload).unwrap();
            let reparsed = Location::from_dict(&location.to_dict()).unwrap();
            assert_eq!(reparsed, location);
        }
    }

    #[test]
    fn test_to_json_round_trip() {
        let location = Location::from_dict(&one_line_locations_response()).unwrap();
        let reparsed = Location::from_json(&location.to_json()).unwrap();
        assert_eq!(reparsed, location);
    }

    #[test]
    fn test_input_address() {
        let mut location = Location::new();
        location.set_input_street("4600 Silver Hill Rd").unwrap();
        location.set_input_zip_code("20233").unwrap();
        let parts = location.input_address();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts.get("street"), Some(&"4600 Silver Hill Rd"));
        assert_eq!(parts.get("zip"), Some(&"20233"));
    }

    #[test]
    fn test_rejects_bad_matches() {
        let payload = json!({"result": {"addressMatches": "none"}});
        assert!(Location::from_dict(&payload).is_err());
    }

    #[test]
    fn test_from_matched_csv_record() {
        let record = csv_row(&[
            "1",
            "4600 Silver Hill Rd, Washington, DC, 20233",
            "Match",
            "Exact",
            "4600 SILVER HILL RD, WASHINGTON, DC, 20233",
            "-76.92744,38.845985",
            "76355984",
            "L",
        ]);
        let location = Location::from_csv_record(&record).unwrap();
        assert_eq!(location.batch_id(), Some("1"));
        assert_eq!(location.match_indicator(), Some("Match"));
        assert_eq!(location.match_type(), Some("Exact"));
        assert_eq!(location.matched_addresses().len(), 1);
        assert_eq!(
            location.matched_addresses()[0].address(),
            Some("4600 SILVER HILL RD, WASHINGTON, DC, 20233")
        );
    }

    #[test]
    fn test_csv_record_round_trip() {
        let matched = Location::from_csv_record(&csv_row(&[
            "1",
            "4600 Silver Hill Rd, Washington, DC, 20233",
            "Match",
            "Exact",
            "4600 SILVER HILL RD, WASHINGTON, DC, 20233",
            "-76.92744,38.845985",
            "76355984",
            "L",
        ]))
        .unwrap();
        let unmatched =
            Location::from_csv_record(&csv_row(&["2", "1 Nowhere Ln", "No_Match"])).unwrap();

        for location in [matched, unmatched] {
            let dict = location.to_dict();
            assert_eq!(dict["result"]["batch"]["id"], json!(location.batch_id()));
            let reparsed = Location::from_dict(&dict).unwrap();
            assert_eq!(reparsed, location);
            assert!(reparsed.extensions().is_empty());
        }
    }

    #[test]
    fn test_from_unmatched_csv_record() {
        let record = csv_row(&["2", "1 Nowhere Ln, Atlantis, ZZ", "No_Match"]);
        let location = Location::from_csv_record(&record).unwrap();
        assert_eq!(location.match_indicator(), Some("No_Match"));
        assert!(location.matched_addresses().is_empty());
    }

    #[test]
    fn test_from_tiny_csv_record() {
        assert!(Location::from_csv_record(&csv_row(&["1"])).is_err());
    }

    #[test]
    fn test_inspect() {
        let location = Location::from_dict(&one_line_locations_response()).unwrap();
        let library = location.inspect(false);
        assert!(library.contains(&"input_one_line".to_string()));
        assert!(library.contains(&"matched_addresses".to_string()));
        assert!(library.contains(&"benchmark".to_string()));
        let census = location.inspect(true);
        assert!(census.contains(&"addressMatches".to_string()));
        assert!(census.contains(&"benchmarkName".to_string()));
    }
}
