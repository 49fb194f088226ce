//! Geocoder client.
//!
//! Every operation follows the same steps: check the inputs, resolve the
//! benchmark/vintage/layers, send one request through the [`Transport`],
//! classify the response and parse it into the entity model.
//!
//! # Example
//!
//! ```ignore
//! use census_geocoder::{config, AddressQuery, EntityType, Geocoder, LookupOptions};
//!
//! let geocoder = Geocoder::new(&config::load())?;
//! let query = AddressQuery::one_line("4600 Silver Hill Rd, Washington, DC 20233");
//! let location = geocoder.from_address(EntityType::Locations, &query, &LookupOptions::default())?;
//! ```

use std::fmt;
use std::path::Path;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use super::batch;
use super::classify::{self, RequestKind};
use super::resolver::{self, ResolvedLookup};
use super::transport::{HttpTransport, Transport, Upload};
use crate::config::{Config, LookupDefaults};
use crate::error::{Error, Result, ResultExt};
use crate::model::{FromWire, Location};

/// Multipart field the batch endpoint reads the file from
const BATCH_FILE_FIELD: &str = "addressFile";

/// What the service returns for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityType {
    /// Matched addresses and coordinates only
    #[default]
    Locations,
    /// Matched addresses plus the geographies containing them
    Geographies,
}

impl EntityType {
    /// API path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locations => "locations",
            Self::Geographies => "geographies",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An address to look up, either one line or in parts.
///
/// When `one_line` is set the parts are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressQuery {
    pub one_line: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl AddressQuery {
    /// A one-line address, e.g. `"4600 Silver Hill Rd, Washington, DC 20233"`.
    pub fn one_line(address: impl Into<String>) -> Self {
        Self {
            one_line: Some(address.into()),
            ..Self::default()
        }
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }

    /// The one-line address, if it holds anything but whitespace.
    fn one_line_text(&self) -> Option<&str> {
        non_blank(&self.one_line)
    }

    /// Populated address parts as request parameters.
    fn parts(&self) -> Vec<(&'static str, String)> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip_code),
        ]
        .into_iter()
        .filter_map(|(name, value)| non_blank(value).map(|v| (name, v.to_string())))
        .collect()
    }

    /// True when there is nothing to look up.
    pub fn is_empty(&self) -> bool {
        self.one_line_text().is_none() && self.parts().is_empty()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Per-call overrides of the configured lookup defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub benchmark: Option<String>,
    pub vintage: Option<String>,
    pub layers: Option<String>,
}

impl LookupOptions {
    pub fn with_benchmark(mut self, benchmark: impl Into<String>) -> Self {
        self.benchmark = Some(benchmark.into());
        self
    }

    pub fn with_vintage(mut self, vintage: impl Into<String>) -> Self {
        self.vintage = Some(vintage.into());
        self
    }

    pub fn with_layers(mut self, layers: impl Into<String>) -> Self {
        self.layers = Some(layers.into());
        self
    }
}

/// Client for the Census Geocoder API.
pub struct Geocoder<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
    defaults: LookupDefaults,
}

impl Geocoder<HttpTransport> {
    /// Create a client talking to the configured service.
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config.service.retry_policy())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Geocoder<T> {
    /// Create a client on a custom transport.
    pub fn with_transport(config: &Config, transport: T) -> Self {
        Self {
            transport,
            base_url: config.service.base_url.trim_end_matches('/').to_string(),
            defaults: config.defaults.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn defaults(&self) -> &LookupDefaults {
        &self.defaults
    }

    /// Resolve options against the configured defaults.
    pub fn resolve(&self, options: &LookupOptions) -> Result<ResolvedLookup> {
        resolver::resolve(
            options.benchmark.as_deref().unwrap_or(&self.defaults.benchmark),
            options.vintage.as_deref().unwrap_or(&self.defaults.vintage),
            options.layers.as_deref().unwrap_or(&self.defaults.layers),
        )
    }

    fn url(&self, entity: EntityType, kind: RequestKind) -> String {
        format!("{}/geocoder/{}/{}", self.base_url, entity, kind.endpoint())
    }

    fn base_params(resolved: &ResolvedLookup) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("benchmark", resolved.benchmark.to_string()),
            ("vintage", resolved.vintage.to_string()),
            ("format", "json".to_string()),
        ];
        if !resolved.layers.is_empty() {
            params.push(("layers", resolved.layers.clone()));
        }
        params
    }

    // ========================================================================
    // Raw payloads
    // ========================================================================

    /// Look up an address and return the raw JSON payload.
    pub fn get_address(
        &self,
        entity: EntityType,
        query: &AddressQuery,
        options: &LookupOptions,
    ) -> Result<Value> {
        let (kind, address_params) = match query.one_line_text() {
            Some(one_line) => (
                RequestKind::OneLine,
                vec![("address", one_line.to_string())],
            ),
            None => {
                let parts = query.parts();
                if parts.is_empty() {
                    return Err(Error::no_address(
                        "supply a one-line address or at least one of street, city, state, zip",
                    ));
                }
                (RequestKind::Address, parts)
            }
        };

        let resolved = self.resolve(options)?;
        let mut params = address_params;
        params.extend(Self::base_params(&resolved));

        let url = self.url(entity, kind);
        debug!(%url, "Address lookup");
        let response = self.transport.get(&url, &params)?;
        classify::classify_json(kind, &response)
    }

    /// Look up a coordinate pair and return the raw JSON payload.
    pub fn get_coordinates(
        &self,
        longitude: Option<Decimal>,
        latitude: Option<Decimal>,
        options: &LookupOptions,
    ) -> Result<Value> {
        let (Some(longitude), Some(latitude)) = (longitude, latitude) else {
            return Err(Error::no_address(
                "coordinate lookups need both a longitude and a latitude",
            ));
        };
        if longitude.abs() > Decimal::from(180) || latitude.abs() > Decimal::from(90) {
            return Err(Error::config(format!(
                "coordinates out of range: longitude {longitude}, latitude {latitude}"
            )));
        }

        let resolved = self.resolve(options)?;
        let mut params = vec![
            ("x", format!("{longitude:.6}")),
            ("y", format!("{latitude:.6}")),
        ];
        params.extend(Self::base_params(&resolved));

        let url = self.url(EntityType::Geographies, RequestKind::Coordinates);
        debug!(%url, "Coordinate lookup");
        let response = self.transport.get(&url, &params)?;
        classify::classify_json(RequestKind::Coordinates, &response)
    }

    /// Submit a batch file and return the result rows.
    pub fn get_batch(
        &self,
        entity: EntityType,
        path: Option<&Path>,
        options: &LookupOptions,
    ) -> Result<Vec<Vec<String>>> {
        let resolved = self.resolve(options)?;
        let path = batch::check_file(path)?;
        let records = batch::check_size(&path)?;

        let bytes = std::fs::read(&path)
            .with_context(format!("Failed to read batch file {}", path.display()))?;
        let upload = Upload {
            field: BATCH_FILE_FIELD.to_string(),
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "addresses.csv".to_string()),
            bytes,
        };

        let url = self.url(entity, RequestKind::Batch);
        debug!(%url, records, "Batch lookup");
        let response = self
            .transport
            .post_multipart(&url, &Self::base_params(&resolved), &upload)?;
        let body = classify::classify_batch(&response)?;
        batch::parse_response(&body)
    }

    // ========================================================================
    // Typed lookups
    // ========================================================================

    /// Geocode an address.
    ///
    /// Fails with [`Error::NoAddress`] before any request when the query is
    /// empty, and with [`Error::EntityNotFound`] when nothing matches.
    pub fn from_address(
        &self,
        entity: EntityType,
        query: &AddressQuery,
        options: &LookupOptions,
    ) -> Result<Location> {
        let payload = self.get_address(entity, query, options)?;
        let location = Location::from_dict(&payload)?;
        info!(
            entity = %entity,
            matches = location.matched_addresses().len(),
            "Address lookup complete"
        );
        Ok(location)
    }

    /// Geographies containing a point.
    pub fn from_coordinates(
        &self,
        longitude: Option<Decimal>,
        latitude: Option<Decimal>,
        options: &LookupOptions,
    ) -> Result<Location> {
        let payload = self.get_coordinates(longitude, latitude, options)?;
        let location = Location::from_dict(&payload)?;
        info!(
            geographies = location.geographies().len(),
            "Coordinate lookup complete"
        );
        Ok(location)
    }

    /// Geocode every row of a batch file, one [`Location`] per row.
    ///
    /// Files over [`batch::MAX_BATCH_RECORDS`] records are rejected before
    /// anything is sent.
    pub fn from_batch(
        &self,
        entity: EntityType,
        path: Option<&Path>,
        options: &LookupOptions,
    ) -> Result<Vec<Location>> {
        let rows = self.get_batch(entity, path, options)?;
        let locations = rows
            .iter()
            .map(|row| Location::from_csv_record(row))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        info!(
            entity = %entity,
            rows = locations.len(),
            matched = locations
                .iter()
                .filter(|l| !l.matched_addresses().is_empty())
                .count(),
            "Batch lookup complete"
        );
        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoder::transport::HttpResponse;
    use crate::geocoder::transport::mocks::MockTransport;
    use crate::test_utils::{
        BATCH_RESPONSE, address_geographies_response, coordinates_geographies_response,
        one_line_locations_response, write_batch_file,
    };
    use serde_json::json;
    use std::str::FromStr;

    fn geocoder(mock: MockTransport) -> Geocoder<MockTransport> {
        Geocoder::with_transport(&Config::default(), mock)
    }

    fn dec(s: &str) -> Option<Decimal> {
        Some(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_one_line_lookup() {
        let geocoder = geocoder(MockTransport::with_json(200, &one_line_locations_response()));
        let query = AddressQuery::one_line("4600 Silver Hill Rd, Washington, DC 20233");
        let location = geocoder
            .from_address(EntityType::Locations, &query, &LookupOptions::default())
            .unwrap();

        assert_eq!(location.matched_addresses()[0].zip_code(), Some("20233"));

        let requests = geocoder.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://geocoding.geo.census.gov/geocoder/locations/onelineaddress"
        );
        assert_eq!(
            requests[0].param("address"),
            Some("4600 Silver Hill Rd, Washington, DC 20233")
        );
        assert_eq!(requests[0].param("benchmark"), Some("Public_AR_Current"));
        assert_eq!(requests[0].param("vintage"), Some("Current_Current"));
        assert_eq!(requests[0].param("format"), Some("json"));
        assert_eq!(requests[0].param("layers"), Some("all"));
    }

    #[test]
    fn test_parametrized_lookup() {
        let geocoder = geocoder(MockTransport::with_json(200, &address_geographies_response()));
        let query = AddressQuery::default()
            .with_street("4600 Silver Hill Rd")
            .with_city("Washington")
            .with_state("DC")
            .with_zip_code("20233");
        let location = geocoder
            .from_address(EntityType::Geographies, &query, &LookupOptions::default())
            .unwrap();
        assert!(!location.matched_addresses()[0].geographies().is_empty());

        let request = &geocoder.transport().requests()[0];
        assert!(request.url.ends_with("/geocoder/geographies/address"));
        assert_eq!(request.param("street"), Some("4600 Silver Hill Rd"));
        assert_eq!(request.param("zip"), Some("20233"));
        assert_eq!(request.param("address"), None);
    }

    #[test]
    fn test_empty_address_is_rejected_before_request() {
        let geocoder = geocoder(MockTransport::with_json(200, &json!({})));
        let blank = AddressQuery::one_line("   ").with_city("");
        for query in [AddressQuery::default(), blank] {
            let err = geocoder
                .from_address(EntityType::Locations, &query, &LookupOptions::default())
                .unwrap_err();
            assert!(matches!(err, Error::NoAddress(_)));
        }
        assert!(geocoder.transport().requests().is_empty());
    }

    #[test]
    fn test_bad_benchmark_is_rejected_before_request() {
        let geocoder = geocoder(MockTransport::with_json(200, &json!({})));
        let options = LookupOptions::default().with_benchmark("NOPE");
        let err = geocoder
            .from_address(EntityType::Locations, &AddressQuery::one_line("x"), &options)
            .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedBenchmark(_)));
        assert!(geocoder.transport().requests().is_empty());
    }

    #[test]
    fn test_options_override_defaults() {
        let geocoder = geocoder(MockTransport::with_json(200, &one_line_locations_response()));
        let options = LookupOptions::default()
            .with_benchmark("census2020")
            .with_vintage("census2010")
            .with_layers("states, counties");
        geocoder
            .from_address(EntityType::Geographies, &AddressQuery::one_line("x"), &options)
            .unwrap();

        let request = &geocoder.transport().requests()[0];
        assert_eq!(request.param("benchmark"), Some("Public_AR_Census2020"));
        assert_eq!(request.param("vintage"), Some("Census2010_Census2020"));
        assert_eq!(request.param("layers"), Some("72,74"));
    }

    #[test]
    fn test_configured_defaults_are_used() {
        let mut config = Config::default();
        config.defaults.vintage = "ACS2019".to_string();
        config.service.base_url = "http://localhost:8080/".to_string();
        let geocoder = Geocoder::with_transport(
            &config,
            MockTransport::with_json(200, &one_line_locations_response()),
        );
        geocoder
            .from_address(EntityType::Locations, &AddressQuery::one_line("x"), &LookupOptions::default())
            .unwrap();

        let request = &geocoder.transport().requests()[0];
        assert_eq!(request.url, "http://localhost:8080/geocoder/locations/onelineaddress");
        assert_eq!(request.param("vintage"), Some("ACS2019_Current"));
    }

    #[test]
    fn test_no_match_is_not_found() {
        let empty = json!({"result": {"input": {}, "addressMatches": []}});
        let geocoder = geocoder(MockTransport::with_json(200, &empty));
        let err = geocoder
            .from_address(EntityType::Locations, &AddressQuery::one_line("nowhere"), &LookupOptions::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_api_error() {
        let geocoder = geocoder(MockTransport::with_text(500, "boom"));
        let err = geocoder
            .from_address(EntityType::Locations, &AddressQuery::one_line("x"), &LookupOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::CensusApi { status: 500, .. }));
    }

    #[test]
    fn test_coordinate_lookup() {
        let geocoder = geocoder(MockTransport::with_json(200, &coordinates_geographies_response()));
        let location = geocoder
            .from_coordinates(dec("-76.92744"), dec("38.845985"), &LookupOptions::default())
            .unwrap();
        assert!(!location.geographies().is_empty());

        let request = &geocoder.transport().requests()[0];
        assert!(request.url.ends_with("/geocoder/geographies/coordinates"));
        assert_eq!(request.param("x"), Some("-76.927440"));
        assert_eq!(request.param("y"), Some("38.845985"));
    }

    #[test]
    fn test_coordinates_required() {
        let geocoder = geocoder(MockTransport::with_json(200, &json!({})));
        let options = LookupOptions::default();
        assert!(matches!(
            geocoder.from_coordinates(None, dec("38.8"), &options),
            Err(Error::NoAddress(_))
        ));
        assert!(matches!(
            geocoder.from_coordinates(dec("-76.9"), None, &options),
            Err(Error::NoAddress(_))
        ));
        assert!(matches!(
            geocoder.from_coordinates(dec("-276.9"), dec("38.8"), &options),
            Err(Error::Configuration(_))
        ));
        assert!(geocoder.transport().requests().is_empty());
    }

    #[test]
    fn test_batch_lookup() {
        let (_dir, path) = write_batch_file(2);
        let geocoder = geocoder(MockTransport::with_text(200, BATCH_RESPONSE));
        let locations = geocoder
            .from_batch(EntityType::Locations, Some(path.as_path()), &LookupOptions::default())
            .unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].batch_id(), Some("1"));
        assert_eq!(locations[0].matched_addresses().len(), 1);
        assert!(locations[1].matched_addresses().is_empty());

        let request = &geocoder.transport().requests()[0];
        assert_eq!(request.method, "POST");
        assert!(request.url.ends_with("/geocoder/locations/addressbatch"));
        assert_eq!(request.param("benchmark"), Some("Public_AR_Current"));
        let upload = request.upload.as_ref().unwrap();
        assert_eq!(upload.field, "addressFile");
        assert_eq!(upload.bytes, std::fs::read(&path).unwrap());
    }

    #[test]
    fn test_batch_too_large_before_request() {
        let (_dir, path) = write_batch_file(batch::MAX_BATCH_RECORDS + 1);
        let geocoder = geocoder(MockTransport::with_text(200, BATCH_RESPONSE));
        let err = geocoder
            .from_batch(EntityType::Locations, Some(path.as_path()), &LookupOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::BatchSizeTooLarge(_)));
        assert!(geocoder.transport().requests().is_empty());
    }

    #[test]
    fn test_batch_without_file() {
        let geocoder = geocoder(MockTransport::with_text(200, BATCH_RESPONSE));
        let options = LookupOptions::default();
        assert!(matches!(
            geocoder.from_batch(EntityType::Locations, None, &options),
            Err(Error::NoFileProvided)
        ));
        assert!(matches!(
            geocoder.from_batch(EntityType::Locations, Some(Path::new("/no/such/file.csv")), &options),
            Err(Error::FileNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_batch() {
        let (_dir, path) = write_batch_file(1);
        let geocoder = geocoder(MockTransport::with_responses(vec![HttpResponse::new(
            400,
            "Malformed input file",
        )]));
        let err = geocoder
            .from_batch(EntityType::Geographies, Some(path.as_path()), &LookupOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedBatchFile(_)));
    }

    // ========================================================================
    // Live service tests (run with `cargo test -- --ignored`)
    // ========================================================================

    fn live() -> Geocoder {
        Geocoder::new(&Config::default()).unwrap()
    }

    #[test]
    #[ignore = "requires network access"]
    fn live_one_line_address() {
        let location = live()
            .from_address(
                EntityType::Locations,
                &AddressQuery::one_line("4600 Silver Hill Rd, Washington, DC 20233"),
                &LookupOptions::default(),
            )
            .unwrap();
        assert!(
            location
                .matched_addresses()
                .iter()
                .any(|m| m.zip_code() == Some("20233"))
        );
    }

    #[test]
    #[ignore = "requires network access"]
    fn live_address_without_street() {
        let query = AddressQuery::default()
            .with_city("Washington")
            .with_state("DC")
            .with_zip_code("20233");
        let err = live()
            .from_address(EntityType::Locations, &query, &LookupOptions::default())
            .unwrap_err();
        assert!(err.is_not_found() || matches!(err, Error::CensusApi { .. }));
    }

    #[test]
    #[ignore = "requires network access"]
    fn live_coordinates() {
        let location = live()
            .from_coordinates(dec("-76.92744"), dec("38.845985"), &LookupOptions::default())
            .unwrap();
        assert!(!location.geographies().is_empty());
    }
}
