//! One candidate match for an address lookup.

use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use super::coerce;
use super::collection::GeographyCollection;
use super::geography::{CSV_GEOGRAPHY_COLUMNS, GeographicArea};
use super::{CensusEntity, FromWire, ModelError};

/// Minimum columns in a batch row that reports a match.
pub(crate) const CSV_MATCH_COLUMNS: usize = 8;

/// Keys of a match object the model reads itself.
const MATCH_KEYS: &[&str] = &[
    "matchedAddress",
    "coordinates",
    "tigerLine",
    "addressComponents",
    "geographies",
];

/// `addressComponents` keys, in wire order.
const COMPONENT_KEYS: &[&str] = &[
    "fromAddress",
    "toAddress",
    "preQualifier",
    "preDirection",
    "preType",
    "streetName",
    "suffixType",
    "suffixDirection",
    "suffixQualifier",
    "city",
    "state",
    "zip",
];

/// A normalized address matched by the geocoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedAddress {
    address: Option<String>,
    longitude: Option<Decimal>,
    latitude: Option<Decimal>,
    tigerline_id: Option<String>,
    tigerline_side: Option<String>,
    from_address: Option<String>,
    to_address: Option<String>,
    pre_qualifier: Option<String>,
    pre_direction: Option<String>,
    pre_type: Option<String>,
    street: Option<String>,
    suffix_type: Option<String>,
    suffix_direction: Option<String>,
    suffix_qualifier: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    geographies: GeographyCollection,
    extensions: Map<String, Value>,
}

impl MatchedAddress {
    pub fn new() -> Self {
        Self::default()
    }

    text_accessors! {
        address, set_address;
        tigerline_id, set_tigerline_id;
        from_address, set_from_address;
        to_address, set_to_address;
        pre_qualifier, set_pre_qualifier;
        pre_direction, set_pre_direction;
        pre_type, set_pre_type;
        street, set_street;
        suffix_type, set_suffix_type;
        suffix_direction, set_suffix_direction;
        suffix_qualifier, set_suffix_qualifier;
        city, set_city;
        state, set_state;
        zip_code, set_zip_code;
    }

    pub fn longitude(&self) -> Option<Decimal> {
        self.longitude
    }

    pub fn set_longitude(&mut self, value: impl Into<Value>) -> Result<(), ModelError> {
        self.longitude = coerce::decimal("longitude", &value.into())?;
        Ok(())
    }

    pub fn latitude(&self) -> Option<Decimal> {
        self.latitude
    }

    pub fn set_latitude(&mut self, value: impl Into<Value>) -> Result<(), ModelError> {
        self.latitude = coerce::decimal("latitude", &value.into())?;
        Ok(())
    }

    /// Side of the street segment the address falls on, `L` or `R`.
    pub fn tigerline_side(&self) -> Option<&str> {
        self.tigerline_side.as_deref()
    }

    pub fn set_tigerline_side(&mut self, value: impl Into<Value>) -> Result<(), ModelError> {
        self.tigerline_side = coerce::street_side("tigerline_side", &value.into())?;
        Ok(())
    }

    /// Geographies containing the match. Empty for `locations` lookups.
    pub fn geographies(&self) -> &GeographyCollection {
        &self.geographies
    }

    pub fn geographies_mut(&mut self) -> &mut GeographyCollection {
        &mut self.geographies
    }

    pub fn set_geographies(&mut self, geographies: GeographyCollection) {
        self.geographies = geographies;
    }

    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }

    /// Parse a bare element of `addressMatches`.
    pub(crate) fn from_match(value: &Value) -> Result<Self, ModelError> {
        let obj = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(obj) => obj,
            _ => return Err(ModelError::NotAnObject("addressMatches".to_string())),
        };

        let mut matched = Self::new();
        let address_key = if obj.contains_key("matchedAddress") {
            "matchedAddress"
        } else {
            "address"
        };
        matched.address = coerce::text("address", obj.get(address_key).unwrap_or(&Value::Null))?;

        let coordinates = obj.get("coordinates").unwrap_or(&Value::Null);
        matched.longitude = coerce::decimal("longitude", field(coordinates, "x"))?;
        matched.latitude = coerce::decimal("latitude", field(coordinates, "y"))?;

        let tiger = obj.get("tigerLine").unwrap_or(&Value::Null);
        matched.tigerline_id = coerce::text("tigerline_id", field(tiger, "tigerLineId"))?;
        matched.tigerline_side = coerce::street_side("tigerline_side", field(tiger, "side"))?;

        let parts = obj.get("addressComponents").unwrap_or(&Value::Null);
        matched.from_address = coerce::text("from_address", field(parts, "fromAddress"))?;
        matched.to_address = coerce::text("to_address", field(parts, "toAddress"))?;
        matched.pre_qualifier = coerce::text("pre_qualifier", field(parts, "preQualifier"))?;
        matched.pre_direction = coerce::text("pre_direction", field(parts, "preDirection"))?;
        matched.pre_type = coerce::text("pre_type", field(parts, "preType"))?;
        matched.street = coerce::text("street", field(parts, "streetName"))?;
        matched.suffix_type = coerce::text("suffix_type", field(parts, "suffixType"))?;
        matched.suffix_direction =
            coerce::text("suffix_direction", field(parts, "suffixDirection"))?;
        matched.suffix_qualifier =
            coerce::text("suffix_qualifier", field(parts, "suffixQualifier"))?;
        matched.city = coerce::text("city", field(parts, "city"))?;
        matched.state = coerce::text("state", field(parts, "state"))?;
        matched.zip_code = coerce::text("zip_code", field(parts, "zip"))?;

        if let Some(geographies) = obj.get("geographies") {
            matched.geographies = GeographyCollection::from_dict(geographies)?;
        }

        for (key, value) in obj {
            if !MATCH_KEYS.contains(&key.as_str()) && key != address_key {
                matched.extensions.insert(key.clone(), value.clone());
            }
        }
        Ok(matched)
    }

    /// Serialize to a bare element of `addressMatches`.
    pub(crate) fn to_match(&self) -> Value {
        let components: Map<String, Value> = COMPONENT_KEYS
            .iter()
            .zip([
                &self.from_address,
                &self.to_address,
                &self.pre_qualifier,
                &self.pre_direction,
                &self.pre_type,
                &self.street,
                &self.suffix_type,
                &self.suffix_direction,
                &self.suffix_qualifier,
                &self.city,
                &self.state,
                &self.zip_code,
            ])
            .map(|(key, value)| (key.to_string(), coerce::emit_text(value)))
            .collect();

        let mut map = Map::new();
        map.insert("matchedAddress".into(), coerce::emit_text(&self.address));
        map.insert(
            "coordinates".into(),
            json!({
                "x": coerce::emit_decimal(&self.longitude),
                "y": coerce::emit_decimal(&self.latitude),
            }),
        );
        map.insert(
            "tigerLine".into(),
            json!({
                "tigerLineId": coerce::emit_text(&self.tigerline_id),
                "side": coerce::emit_text(&self.tigerline_side),
            }),
        );
        map.insert("addressComponents".into(), Value::Object(components));
        if !self.geographies.is_empty() || !self.geographies.extensions().is_empty() {
            map.insert("geographies".into(), self.geographies.to_dict());
        }
        for (key, value) in &self.extensions {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }
}

fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&Value::Null)
}

impl FromWire for MatchedAddress {
    /// Parse from the `{"result": {"addressMatches": <match>}}` envelope.
    fn from_dict(value: &Value) -> Result<Self, ModelError> {
        if !value.is_object() && !value.is_null() {
            return Err(ModelError::NotAnObject("MatchedAddress".to_string()));
        }
        Self::from_match(field(field(value, "result"), "addressMatches"))
    }

    /// Build from a batch row: matched address in column 4, `"lon,lat"` in
    /// column 5, TIGER/Line id and side in 6 and 7, and the census block in
    /// columns 8 to 11 when the batch asked for geographies.
    fn from_csv_record(record: &[String]) -> Result<Self, ModelError> {
        if record.len() < CSV_MATCH_COLUMNS {
            return Err(ModelError::ShortRecord {
                expected: CSV_MATCH_COLUMNS,
                actual: record.len(),
            });
        }

        let mut matched = Self::new();
        matched.address = coerce::text("address", &Value::from(record[4].trim()))?;
        if let Some((lon, lat)) = coerce::coordinate_pair(&record[5]) {
            matched.longitude = coerce::decimal("longitude", &lon)?;
            matched.latitude = coerce::decimal("latitude", &lat)?;
        }
        matched.tigerline_id = coerce::text("tigerline_id", &Value::from(record[6].trim()))?;
        matched.tigerline_side =
            coerce::street_side("tigerline_side", &Value::from(record[7].trim()))?;

        if record.len() >= CSV_GEOGRAPHY_COLUMNS {
            matched
                .geographies
                .push(GeographicArea::from_csv_record(record)?);
        }
        Ok(matched)
    }
}

impl CensusEntity for MatchedAddress {
    fn entity_type(&self) -> &'static str {
        "address"
    }

    fn to_dict(&self) -> Value {
        json!({ "result": { "addressMatches": self.to_match() } })
    }

    fn inspect(&self, as_census_fields: bool) -> Vec<String> {
        let fields: [(&str, &str, bool); 17] = [
            ("address", "matchedAddress", self.address.is_some()),
            ("longitude", "x", self.longitude.is_some()),
            ("latitude", "y", self.latitude.is_some()),
            ("tigerline_id", "tigerLineId", self.tigerline_id.is_some()),
            ("tigerline_side", "side", self.tigerline_side.is_some()),
            ("from_address", "fromAddress", self.from_address.is_some()),
            ("to_address", "toAddress", self.to_address.is_some()),
            ("pre_qualifier", "preQualifier", self.pre_qualifier.is_some()),
            ("pre_direction", "preDirection", self.pre_direction.is_some()),
            ("pre_type", "preType", self.pre_type.is_some()),
            ("street", "streetName", self.street.is_some()),
            ("suffix_type", "suffixType", self.suffix_type.is_some()),
            ("suffix_direction", "suffixDirection", self.suffix_direction.is_some()),
            ("suffix_qualifier", "suffixQualifier", self.suffix_qualifier.is_some()),
            ("city", "city", self.city.is_some()),
            ("state", "state", self.state.is_some()),
            ("zip_code", "zip", self.zip_code.is_some()),
        ];
        let mut names: Vec<String> = fields
            .iter()
            .filter(|(_, _, populated)| *populated)
            .map(|(name, wire, _)| (if as_census_fields { wire } else { name }).to_string())
            .collect();
        if !self.geographies.is_empty() {
            names.push("geographies".to_string());
        }
        names.extend(self.extensions.keys().cloned());
        names
    }
}
