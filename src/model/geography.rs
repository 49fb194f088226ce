//! A single Census geography.
//!
//! [`GeographicArea`] is one struct shared by every [`GeographyType`]: the
//! service returns the same attribute vocabulary for all of them, and any
//! given area only fills in the attributes that apply to it. Attributes are
//! private and validated on every write; unknown wire keys are kept in
//! [`GeographicArea::extensions`].

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::codes::{self, LsadCategory};
use super::coerce;
use super::taxonomy::GeographyType;
use super::{CensusEntity, ModelError};

/// Secondary wire key accepted for [`GeographicArea::lsad`].
const LSAD_ALIAS: &str = "LSAD";

/// Minimum columns in a batch row that carries geography columns.
pub(crate) const CSV_GEOGRAPHY_COLUMNS: usize = 12;

fn emit_value<T: Copy + Into<Value>>(value: &Option<T>) -> Option<Value> {
    Some(coerce::emit_number(value))
}

fn emit_coordinate(value: &Option<Decimal>) -> Option<Value> {
    value.map(|v| Value::String(coerce::format_coordinate(v)))
}

macro_rules! geography_attributes {
    (
        text {
            $( $(#[doc = $tdoc:literal])* $tfield:ident, $tsetter:ident => $twire:literal via $tcoerce:ident; )+
        }
        values {
            $( $(#[doc = $vdoc:literal])* $vfield:ident, $vsetter:ident: $vty:ty => $vwire:literal via $vcoerce:ident, emit $vemit:ident; )+
        }
    ) => {
        /// One geography returned by the Census Geocoder.
        #[derive(Debug, Clone, PartialEq)]
        pub struct GeographicArea {
            geography_type: GeographyType,
            $( $tfield: Option<String>, )+
            $( $vfield: Option<$vty>, )+
            extensions: Map<String, Value>,
        }

        impl GeographicArea {
            /// `(library name, wire key)` of every declared attribute.
            pub const ATTRIBUTES: &'static [(&'static str, &'static str)] = &[
                $( (stringify!($tfield), $twire), )+
                $( (stringify!($vfield), $vwire), )+
            ];

            /// An area of the given type with no attributes set.
            pub fn new(geography_type: GeographyType) -> Self {
                Self {
                    geography_type,
                    $( $tfield: None, )+
                    $( $vfield: None, )+
                    extensions: Map::new(),
                }
            }

            $(
                $(#[doc = $tdoc])*
                pub fn $tfield(&self) -> Option<&str> {
                    self.$tfield.as_deref()
                }

                pub fn $tsetter(&mut self, value: impl Into<Value>) -> Result<(), ModelError> {
                    self.$tfield = coerce::$tcoerce(stringify!($tfield), &value.into())?;
                    Ok(())
                }
            )+

            $(
                $(#[doc = $vdoc])*
                pub fn $vfield(&self) -> Option<$vty> {
                    self.$vfield
                }

                pub fn $vsetter(&mut self, value: impl Into<Value>) -> Result<(), ModelError> {
                    self.$vfield = coerce::$vcoerce(stringify!($vfield), &value.into())?;
                    Ok(())
                }
            )+

            /// Set a declared attribute by library name.
            ///
            /// Returns `Ok(false)` when `name` is not a declared attribute.
            pub fn set_attribute(&mut self, name: &str, value: &Value) -> Result<bool, ModelError> {
                match name {
                    $( stringify!($tfield) => self.$tfield = coerce::$tcoerce(name, value)?, )+
                    $( stringify!($vfield) => self.$vfield = coerce::$vcoerce(name, value)?, )+
                    _ => return Ok(false),
                }
                Ok(true)
            }

            fn set_wire(&mut self, key: &str, value: &Value) -> Result<bool, ModelError> {
                match key {
                    $( $twire => self.$tfield = coerce::$tcoerce(stringify!($tfield), value)?, )+
                    $( $vwire => self.$vfield = coerce::$vcoerce(stringify!($vfield), value)?, )+
                    _ => return Ok(false),
                }
                Ok(true)
            }

            /// Wire key and emitted value of each attribute; `None` means omit.
            fn wire_entries(&self) -> Vec<(&'static str, Option<Value>)> {
                vec![
                    $( ($twire, Some(coerce::emit_text(&self.$tfield))), )+
                    $( ($vwire, $vemit(&self.$vfield)), )+
                ]
            }

            fn populated(&self) -> Vec<(&'static str, &'static str)> {
                let mut out = Vec::new();
                $( if self.$tfield.is_some() { out.push((stringify!($tfield), $twire)); } )+
                $( if self.$vfield.is_some() { out.push((stringify!($vfield), $vwire)); } )+
                out
            }
        }
    };
}

geography_attributes! {
    text {
        /// Geographic identifier (`GEOID`)
        geoid, set_geoid => "GEOID" via text;
        /// Object identifier in the TIGERweb service (`OID`)
        oid, set_oid => "OID" via text;
        name, set_name => "NAME" via text;
        /// Name without its LSAD descriptor (`BASENAME`)
        basename, set_basename => "BASENAME" via text;
        /// Functional status code (`FUNCSTAT`), see [`GeographicArea::functional_status`]
        funcstat, set_funcstat => "FUNCSTAT" via funcstat;
        /// Legal/statistical area descriptor code (`LSADC`)
        lsad, set_lsad => "LSADC" via lsad;
        /// Legislative session year (`LSY`)
        legislative_session_year, set_legislative_session_year => "LSY" via session_year;
        state_fips_code, set_state_fips_code => "STATE" via text;
        state_ns, set_state_ns => "STATENS" via text;
        /// USPS state abbreviation (`STUSAB`)
        state_abbreviation, set_state_abbreviation => "STUSAB" via upper;
        division_fips_code, set_division_fips_code => "DIVISION" via text;
        region_fips_code, set_region_fips_code => "REGION" via text;
        tract, set_tract => "TRACT" via text;
        block, set_block => "BLOCK" via text;
        block_group, set_block_group => "BLKGRP" via text;
        /// Land/water block type (`LWBLKTYP`)
        block_type, set_block_type => "LWBLKTYP" via text;
        county_fips_code, set_county_fips_code => "COUNTY" via text;
        county_cc, set_county_cc => "COUNTYCC" via text;
        county_ns, set_county_ns => "COUNTYNS" via text;
        county_subdivision, set_county_subdivision => "COUSUB" via text;
        county_subdivision_cc, set_county_subdivision_cc => "COUSUBCC" via text;
        county_subdivision_ns, set_county_subdivision_ns => "COUSUBNS" via text;
        place, set_place => "PLACE" via text;
        place_cc, set_place_cc => "PLACECC" via text;
        place_ns, set_place_ns => "PLACENS" via text;
        /// NECTA principal city indicator (`NECTAPCI`)
        necta_pci, set_necta_pci => "NECTAPCI" via principal_city;
        /// CBSA principal city indicator (`CBSAPCI`)
        cbsa_pci, set_cbsa_pci => "CBSAPCI" via principal_city;
        congressional_session_code, set_congressional_session_code => "CDSESSN" via text;
        zcta5, set_zcta5 => "ZCTA5" via text;
        zcta5_cc, set_zcta5_cc => "ZCTA5CC" via text;
        school_district_type, set_school_district_type => "SDTYP" via text;
        unified_school_district, set_unified_school_district => "SDUNI" via text;
        secondary_school_district, set_secondary_school_district => "SDSEC" via text;
        elementary_school_district, set_elementary_school_district => "SDELM" via text;
        low_school_grade, set_low_school_grade => "LOGRADE" via text;
        high_school_grade, set_high_school_grade => "HIGRADE" via text;
        state_legislative_district_upper, set_state_legislative_district_upper => "SLDU" via text;
        state_legislative_district_lower, set_state_legislative_district_lower => "SLDL" via text;
        legislative_district_type, set_legislative_district_type => "LDTYP" via text;
        voting_district, set_voting_district => "VTD" via text;
        voting_district_indicator, set_voting_district_indicator => "VTDI" via text;
        metropolitan_division, set_metropolitan_division => "METDIV" via text;
        /// Combined statistical area code (`CSA`)
        csa, set_csa => "CSA" via text;
        /// Core-based statistical area code (`CBSA`)
        cbsa, set_cbsa => "CBSA" via text;
        necta, set_necta => "NECTA" via text;
        combined_necta, set_combined_necta => "CNECTA" via text;
        necta_division, set_necta_division => "NCTADV" via text;
        urban_area, set_urban_area => "UA" via text;
        urban_rural, set_urban_rural => "UR" via text;
        /// MAF/TIGER feature class code (`MTFCC`)
        mtfcc, set_mtfcc => "MTFCC" via text;
    }
    values {
        object_id, set_object_id: i64 => "OBJECTID" via integer, emit emit_value;
        /// 2020 Census population count (`POP100`)
        population, set_population: u64 => "POP100" via area, emit emit_value;
        /// 2020 Census housing unit count (`HU100`)
        housing_units, set_housing_units: u64 => "HU100" via area, emit emit_value;
        /// Centroid longitude (`CENTLON`)
        longitude, set_longitude: Decimal => "CENTLON" via coordinate, emit emit_coordinate;
        /// Centroid latitude (`CENTLAT`)
        latitude, set_latitude: Decimal => "CENTLAT" via coordinate, emit emit_coordinate;
        /// Internal point longitude (`INTPTLON`)
        longitude_internal_point, set_longitude_internal_point: Decimal => "INTPTLON" via coordinate, emit emit_coordinate;
        /// Internal point latitude (`INTPTLAT`)
        latitude_internal_point, set_latitude_internal_point: Decimal => "INTPTLAT" via coordinate, emit emit_coordinate;
        /// Water area in square meters (`AREAWATER`)
        water_area, set_water_area: u64 => "AREAWATER" via area, emit emit_value;
        /// Land area in square meters (`AREALAND`)
        land_area, set_land_area: u64 => "AREALAND" via area, emit emit_value;
    }
}

impl GeographicArea {
    /// Build from library-named attributes. Wire keys of declared attributes
    /// (`GEOID`, `LSADC`, ...) are accepted too; anything else is kept as an
    /// extension.
    pub fn with_attributes<I, K>(geography_type: GeographyType, attributes: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut area = Self::new(geography_type);
        for (name, value) in attributes {
            let name = name.into();
            if !area.set_attribute(&name, &value)? && !area.set_wire(&name, &value)? {
                area.extensions.insert(name, value);
            }
        }
        Ok(area)
    }

    /// Parse an area of the given type from its wire shape.
    pub fn from_dict(geography_type: GeographyType, value: &Value) -> Result<Self, ModelError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ModelError::NotAnObject(geography_type.label().to_string()))?;

        let mut area = Self::new(geography_type);
        let has_primary_lsad = obj.contains_key("LSADC");
        for (key, val) in obj {
            if key == LSAD_ALIAS && !has_primary_lsad {
                area.lsad = coerce::lsad("lsad", val)?;
            } else if !area.set_wire(key, val)? {
                area.extensions.insert(key.clone(), val.clone());
            }
        }

        if !obj.contains_key("BASENAME") {
            area.basename = area.name.clone();
        }
        Ok(area)
    }

    /// Parse an area of the given type from a JSON string.
    pub fn from_json(geography_type: GeographyType, json: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_dict(geography_type, &value)
    }

    /// Build the census block reported in a geography batch row
    /// (`id, address, match, type, matched address, "lon,lat", tiger id,
    /// side, state, county, tract, block`).
    pub fn from_csv_record(record: &[String]) -> Result<Self, ModelError> {
        if record.len() < CSV_GEOGRAPHY_COLUMNS {
            return Err(ModelError::ShortRecord {
                expected: CSV_GEOGRAPHY_COLUMNS,
                actual: record.len(),
            });
        }

        let mut area = Self::new(GeographyType::CensusBlock);
        if let Some((lon, lat)) = coerce::coordinate_pair(&record[5]) {
            area.longitude = coerce::coordinate("longitude", &lon)?;
            area.latitude = coerce::coordinate("latitude", &lat)?;
        }
        area.state_fips_code = coerce::text("state_fips_code", &Value::from(record[8].trim()))?;
        area.county_fips_code = coerce::text("county_fips_code", &Value::from(record[9].trim()))?;
        area.tract = coerce::text("tract", &Value::from(record[10].trim()))?;
        area.block = coerce::text("block", &Value::from(record[11].trim()))?;

        if let (Some(state), Some(county), Some(tract), Some(block)) =
            (&area.state_fips_code, &area.county_fips_code, &area.tract, &area.block)
        {
            area.geoid = Some(format!("{state}{county}{tract}{block}"));
        }
        Ok(area)
    }

    pub fn geography_type(&self) -> GeographyType {
        self.geography_type
    }

    /// Whether this area's type is `other` or a vintage of it.
    pub fn is_a(&self, other: GeographyType) -> bool {
        self.geography_type.is_a(other)
    }

    /// Wire keys the model does not declare, with their raw values.
    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Store an unrecognized wire key. A declared wire key sets its
    /// attribute instead.
    pub fn set_extension(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), ModelError> {
        let key = key.into();
        let value = value.into();
        if !self.set_wire(&key, &value)? {
            self.extensions.insert(key, value);
        }
        Ok(())
    }

    /// Definition of [`GeographicArea::funcstat`].
    pub fn functional_status(&self) -> Option<&'static str> {
        self.funcstat.as_deref().and_then(codes::funcstat_description)
    }

    /// Descriptor for [`GeographicArea::lsad`] without its placement annotation.
    pub fn legal_statistical_area(&self) -> Option<String> {
        self.lsad.as_deref().and_then(codes::lsad_descriptor)
    }

    pub fn lsad_category(&self) -> LsadCategory {
        self.lsad
            .as_deref()
            .and_then(codes::lsad_label)
            .map(LsadCategory::of)
            .unwrap_or(LsadCategory::Unspecified)
    }

    /// Whether the area is the principal city of its CBSA or NECTA.
    pub fn is_principal_city(&self) -> bool {
        self.cbsa_pci.as_deref() == Some("Y") || self.necta_pci.as_deref() == Some("Y")
    }
}

impl CensusEntity for GeographicArea {
    fn entity_type(&self) -> &'static str {
        "geographies"
    }

    fn to_dict(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in self.wire_entries() {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        }
        for (key, value) in &self.extensions {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    fn inspect(&self, as_census_fields: bool) -> Vec<String> {
        let mut names = Vec::new();
        for (name, wire) in self.populated() {
            if as_census_fields {
                names.push(wire.to_string());
                continue;
            }
            names.push(name.to_string());
            match name {
                "funcstat" if self.functional_status().is_some() => {
                    names.push("functional_status".to_string());
                }
                "lsad" if self.legal_statistical_area().is_some() => {
                    names.push("legal_statistical_area".to_string());
                    names.push("lsad_category".to_string());
                }
                _ => {}
            }
        }
        if !as_census_fields && self.is_principal_city() {
            names.push("is_principal_city".to_string());
        }
        names.extend(self.extensions.keys().cloned());
        names
    }
}
