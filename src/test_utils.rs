//! Test utilities and fixtures for census-geocoder tests.
//!
//! The JSON fixtures are trimmed copies of real service responses for the
//! Census Bureau headquarters (4600 Silver Hill Rd, Washington, DC 20233).
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{one_line_locations_response, write_batch_file};
//!
//! #[test]
//! fn test_something() {
//!     let location = Location::from_dict(&one_line_locations_response()).unwrap();
//!     let (_dir, path) = write_batch_file(3);
//!     // ... test logic
//! }
//! ```

use std::io::Write;
use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;

/// Batch response with one matched row and one unmatched row.
pub const BATCH_RESPONSE: &str = concat!(
    "\"1\",\"4600 Silver Hill Rd, Washington, DC, 20233\",\"Match\",\"Exact\",",
    "\"4600 SILVER HILL RD, WASHINGTON, DC, 20233\",\"-76.92744,38.845985\",\"76355984\",\"L\"\n",
    "\"2\",\"1 Nowhere Ln, Atlantis, ZZ, 00000\",\"No_Match\"\n",
);

/// Writes a batch input file with `records` addresses.
///
/// Keep the returned `TempDir` alive for as long as the file is needed.
pub fn write_batch_file(records: usize) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("addresses.csv");
    let mut file = std::fs::File::create(&path).expect("Failed to create batch file");
    for id in 1..=records {
        writeln!(file, "{id},4600 Silver Hill Rd,Washington,DC,20233")
            .expect("Failed to write batch file");
    }
    (dir, path)
}

/// A `ZIP Code Tabulation Areas` entry.
pub fn zcta_payload() -> Value {
    json!({
        "GEOID": "20746",
        "OID": "221404254497563",
        "OBJECTID": 1926,
        "NAME": "ZCTA5 20746",
        "BASENAME": "20746",
        "ZCTA5": "20746",
        "ZCTA5CC": "B5",
        "LSADC": "Z5",
        "FUNCSTAT": "S",
        "MTFCC": "G6350",
        "AREALAND": 19595655,
        "AREAWATER": 47839,
        "CENTLAT": "+38.8366493",
        "CENTLON": "-076.9193615",
        "INTPTLAT": "+38.8368126",
        "INTPTLON": "-076.9188624"
    })
}

/// A `County Subdivisions` entry.
pub fn county_subdivision_payload() -> Value {
    json!({
        "GEOID": "2403390524",
        "OID": "27490296183225",
        "OBJECTID": 1096,
        "NAME": "District 6, Spauldings",
        "BASENAME": "6, Spauldings",
        "STATE": "24",
        "COUNTY": "033",
        "COUSUB": "90524",
        "COUSUBCC": "Z5",
        "COUSUBNS": "01929662",
        "LSADC": "28",
        "FUNCSTAT": "N",
        "MTFCC": "G4040",
        "AREALAND": 37853781,
        "AREAWATER": 0,
        "CENTLAT": "+38.8562478",
        "CENTLON": "-076.9122563",
        "INTPTLAT": "+38.8566417",
        "INTPTLON": "-076.9096453"
    })
}

fn maryland_payload() -> Value {
    json!({
        "GEOID": "24",
        "OID": "27490331296207",
        "OBJECTID": 33,
        "NAME": "Maryland",
        "BASENAME": "Maryland",
        "STATE": "24",
        "STATENS": "01714934",
        "STUSAB": "MD",
        "DIVISION": "5",
        "REGION": "3",
        "LSADC": "00",
        "FUNCSTAT": "A",
        "MTFCC": "G4000",
        "AREALAND": 25151895765u64,
        "AREAWATER": 6979171386u64,
        "CENTLAT": "+38.9466584",
        "CENTLON": "-076.6744939",
        "INTPTLAT": "+38.9466584",
        "INTPTLON": "-076.6744939"
    })
}

fn prince_georges_payload() -> Value {
    json!({
        "GEOID": "24033",
        "OID": "27590331264532",
        "OBJECTID": 2451,
        "NAME": "Prince George's County",
        "BASENAME": "Prince George's",
        "STATE": "24",
        "COUNTY": "033",
        "COUNTYCC": "H1",
        "COUNTYNS": "01714670",
        "LSADC": "06",
        "FUNCSTAT": "A",
        "MTFCC": "G4020",
        "AREALAND": 1247645855,
        "AREAWATER": 36999813,
        "CENTLAT": "+38.8256824",
        "CENTLON": "-076.8472883",
        "INTPTLAT": "+38.8300867",
        "INTPTLON": "-076.8458920"
    })
}

/// One element of `addressMatches`, without geographies.
pub fn silver_hill_match() -> Value {
    json!({
        "matchedAddress": "4600 SILVER HILL RD, WASHINGTON, DC, 20233",
        "coordinates": {"x": -76.92744, "y": 38.845985},
        "tigerLine": {"tigerLineId": "76355984", "side": "L"},
        "addressComponents": {
            "fromAddress": "4600",
            "toAddress": "4700",
            "preQualifier": "",
            "preDirection": "",
            "preType": "",
            "streetName": "SILVER HILL",
            "suffixType": "RD",
            "suffixDirection": "",
            "suffixQualifier": "",
            "city": "WASHINGTON",
            "state": "DC",
            "zip": "20233"
        }
    })
}

fn current_benchmark() -> Value {
    json!({
        "isDefault": true,
        "benchmarkDescription": "Public Address Ranges - Current Benchmark",
        "id": "4",
        "benchmarkName": "Public_AR_Current"
    })
}

fn current_vintage() -> Value {
    json!({
        "isDefault": true,
        "id": "4",
        "vintageName": "Current_Current",
        "vintageDescription": "Current Vintage - Current Benchmark"
    })
}

/// `locations/onelineaddress` response.
pub fn one_line_locations_response() -> Value {
    json!({
        "result": {
            "input": {
                "address": {"address": "4600 Silver Hill Rd, Washington, DC 20233"},
                "benchmark": current_benchmark()
            },
            "addressMatches": [silver_hill_match()]
        }
    })
}

/// `geographies/address` response.
pub fn address_geographies_response() -> Value {
    let mut matched = silver_hill_match();
    matched["geographies"] = json!({
        "States": [maryland_payload()],
        "Counties": [prince_georges_payload()],
        "County Subdivisions": [county_subdivision_payload()]
    });
    json!({
        "result": {
            "input": {
                "address": {
                    "street": "4600 Silver Hill Rd",
                    "city": "Washington",
                    "state": "DC",
                    "zip": "20233"
                },
                "benchmark": current_benchmark(),
                "vintage": current_vintage()
            },
            "addressMatches": [matched]
        }
    })
}

/// `geographies/coordinates` response.
pub fn coordinates_geographies_response() -> Value {
    json!({
        "result": {
            "input": {
                "location": {"x": -76.92744, "y": 38.845985},
                "benchmark": current_benchmark(),
                "vintage": current_vintage()
            },
            "geographies": {
                "States": [maryland_payload()],
                "Counties": [prince_georges_payload()],
                "2020 Census Blocks": [{
                    "GEOID": "240338024051084",
                    "OID": "210404076227012",
                    "OBJECTID": 4306942,
                    "NAME": "Block 1084",
                    "BASENAME": "1084",
                    "STATE": "24",
                    "COUNTY": "033",
                    "TRACT": "802405",
                    "BLKGRP": "1",
                    "BLOCK": "1084",
                    "SUFFIX": "",
                    "LWBLKTYP": "L",
                    "UR": "U",
                    "FUNCSTAT": "S",
                    "MTFCC": "G5040",
                    "POP100": 0,
                    "HU100": 0,
                    "AREALAND": 1121083,
                    "AREAWATER": 0,
                    "CENTLAT": "+38.8462013",
                    "CENTLON": "-076.9290786",
                    "INTPTLAT": "+38.8462013",
                    "INTPTLON": "-076.9290786"
                }]
            }
        }
    })
}
