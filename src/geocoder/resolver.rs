//! Benchmark, vintage and layer resolution.
//!
//! The service names its reference data with long canonical names
//! (`Public_AR_Current`, `Census2020_Current`). Callers use short codes
//! (`CURRENT`, `CENSUS2020`), matched case-insensitively. A vintage code only
//! means something within a benchmark: `CENSUS2020` resolves to
//! `Census2020_Current` under `CURRENT` but `Census2020_Census2020` under
//! `CENSUS2020`.
//!
//! Layers are a comma-separated list of geography categories (or collection
//! slot names) translated to the numeric map-service layer IDs of the
//! resolved vintage. `"all"` is passed through unchanged.

use tracing::debug;

use crate::error::{Error, Result};

/// Benchmark short code → canonical name.
pub const BENCHMARKS: &[(&str, &str)] = &[
    ("CURRENT", "Public_AR_Current"),
    ("TAB2020", "Public_AR_TAB2020"),
    ("CENSUS2020", "Public_AR_Census2020"),
];

const CURRENT_VINTAGES: &[(&str, &str)] = &[
    ("CURRENT", "Current_Current"),
    ("CENSUS2020", "Census2020_Current"),
    ("ACS2019", "ACS2019_Current"),
    ("ACS2018", "ACS2018_Current"),
    ("ACS2017", "ACS2017_Current"),
    ("CENSUS2010", "Census2010_Current"),
];

const CENSUS2020_VINTAGES: &[(&str, &str)] = &[
    ("CENSUS2020", "Census2020_Census2020"),
    ("CENSUS2010", "Census2010_Census2020"),
];

const TAB2020_VINTAGES: &[(&str, &str)] = &[
    ("CURRENT", "Current_TAB2020"),
    ("CENSUS2020", "Census2020_TAB2020"),
    ("ACS2019", "ACS2019_TAB2020"),
    ("ACS2018", "ACS2018_TAB2020"),
    ("ACS2017", "ACS2017_TAB2020"),
    ("CENSUS2010", "Census2010_TAB2020"),
];

/// Vintages available within a benchmark, keyed by canonical benchmark name.
pub fn vintages(benchmark: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match benchmark {
        "Public_AR_Current" => Some(CURRENT_VINTAGES),
        "Public_AR_Census2020" => Some(CENSUS2020_VINTAGES),
        "Public_AR_TAB2020" => Some(TAB2020_VINTAGES),
        _ => None,
    }
}

// ============================================================================
// Layer Tables
// ============================================================================

type LayerTable = &'static [(&'static str, &'static str)];

const CURRENT_LAYERS: LayerTable = &[
    ("Public Use Microdata Areas", "0"),
    ("Traffic Analysis Districts", "2"),
    ("Traffic Analysis Zones", "4"),
    ("Urban Growth Areas", "6"),
    ("Census Tracts", "8"),
    ("Census Block Groups", "10"),
    ("Census Blocks", "12"),
    ("Unified School Districts", "14"),
    ("Secondary School Districts", "16"),
    ("Elementary School Districts", "18"),
    ("Estates", "20"),
    ("County Subdivisions", "22"),
    ("Subbarrios", "24"),
    ("Consolidated Cities", "26"),
    ("Incorporated Places", "28"),
    ("Census Designated Places", "30"),
    ("Alaska Native Regional Corporations", "32"),
    ("Tribal Subdivisions", "34"),
    ("Federal American Indian Reservations", "36"),
    ("Off-Reservation Trust Lands", "38"),
    ("State American Indian Reservations", "40"),
    ("Hawaiian Home Lands", "42"),
    ("Alaska Native Village Statistical Areas", "44"),
    ("Oklahoma Tribal Statistical Areas", "46"),
    ("State Designated Tribal Statistical Areas", "48"),
    ("Tribal Designated Statistical Areas", "50"),
    ("American Indian Joint-Use Areas", "52"),
    ("Congressional Districts", "54"),
    ("State Legislative Districts - Upper", "56"),
    ("State Legislative Districts - Lower", "58"),
    ("Voting Districts", "60"),
    ("Combined New England City and Town Areas", "62"),
    ("New England City and Town Area Divisions", "64"),
    ("Metropolitan New England City and Town Areas", "66"),
    ("Micropolitan New England City and Town Areas", "68"),
    ("Combined Statistical Areas", "70"),
    ("Metropolitan Divisions", "72"),
    ("Metropolitan Statistical Areas", "74"),
    ("Micropolitan Statistical Areas", "76"),
    ("Tribal Census Tracts", "78"),
    ("Tribal Census Block Groups", "80"),
    ("Census Regions", "82"),
    ("Census Divisions", "84"),
    ("States", "86"),
    ("Counties", "88"),
    ("ZIP Code Tabulation Areas", "90"),
];

const CENSUS2020_LAYERS: LayerTable = &[
    ("Public Use Microdata Areas", "0"),
    ("Census Tracts", "6"),
    ("Census Block Groups", "8"),
    ("2020 Census Blocks", "10"),
    ("Unified School Districts", "12"),
    ("Secondary School Districts", "14"),
    ("Elementary School Districts", "16"),
    ("Estates", "18"),
    ("County Subdivisions", "22"),
    ("Subbarrios", "24"),
    ("Consolidated Cities", "26"),
    ("Incorporated Places", "28"),
    ("Census Designated Places", "30"),
    ("Alaska Native Regional Corporations", "32"),
    ("Tribal Subdivisions", "34"),
    ("Federal American Indian Reservations", "36"),
    ("Off-Reservation Trust Lands", "38"),
    ("State American Indian Reservations", "40"),
    ("Hawaiian Home Lands", "42"),
    ("Alaska Native Village Statistical Areas", "44"),
    ("Oklahoma Tribal Statistical Areas", "46"),
    ("State Designated Tribal Statistical Areas", "48"),
    ("Tribal Designated Statistical Areas", "50"),
    ("American Indian Joint-Use Areas", "52"),
    ("116th Congressional Districts", "54"),
    ("2018 State Legislative Districts - Upper", "56"),
    ("2018 State Legislative Districts - Lower", "58"),
    ("Voting Districts", "60"),
    ("Combined Statistical Areas", "62"),
    ("Metropolitan Divisions", "64"),
    ("Metropolitan Statistical Areas", "66"),
    ("Micropolitan Statistical Areas", "68"),
    ("Tribal Census Tracts", "70"),
    ("Tribal Census Block Groups", "72"),
    ("Census Regions", "74"),
    ("Census Divisions", "76"),
    ("States", "78"),
    ("Counties", "80"),
    ("2020 ZIP code Tabulation Areas", "82"),
];

const ACS_LAYERS: LayerTable = &[
    ("Public Use Microdata Areas", "0"),
    ("Traffic Analysis Districts", "2"),
    ("Traffic Analysis Zones", "4"),
    ("Urban Growth Areas", "6"),
    ("Census Tracts", "8"),
    ("Census Block Groups", "10"),
    ("Unified School Districts", "14"),
    ("Secondary School Districts", "16"),
    ("Elementary School Districts", "18"),
    ("Estates", "20"),
    ("County Subdivisions", "22"),
    ("Subbarrios", "24"),
    ("Consolidated Cities", "26"),
    ("Incorporated Places", "28"),
    ("Census Designated Places", "30"),
    ("Alaska Native Regional Corporations", "32"),
    ("Tribal Subdivisions", "34"),
    ("Federal American Indian Reservations", "36"),
    ("Off-Reservation Trust Lands", "38"),
    ("State American Indian Reservations", "40"),
    ("Hawaiian Home Lands", "42"),
    ("Alaska Native Village Statistical Areas", "44"),
    ("Oklahoma Tribal Statistical Areas", "46"),
    ("State Designated Tribal Statistical Areas", "48"),
    ("Tribal Designated Statistical Areas", "50"),
    ("American Indian Joint-Use Areas", "52"),
    ("116th Congressional Districts", "54"),
    ("2018 State Legislative Districts - Upper", "56"),
    ("2018 State Legislative Districts - Lower", "58"),
    ("Combined New England City and Town Areas", "60"),
    ("New England City and Town Area Divisions", "62"),
    ("Metropolitan New England City and Town Areas", "64"),
    ("Micropolitan New England City and Town Areas", "66"),
    ("Combined Statistical Areas", "68"),
    ("Metropolitan Divisions", "70"),
    ("Metropolitan Statistical Areas", "72"),
    ("Micropolitan Statistical Areas", "74"),
    ("Urbanized Areas", "76"),
    ("Urban Clusters", "78"),
    ("Census Regions", "80"),
    ("Census Divisions", "82"),
    ("States", "84"),
    ("Counties", "86"),
    ("ZIP Code Tabulation Areas", "88"),
];

const CENSUS2010_LAYERS: LayerTable = &[
    ("2010 Census Public Use Microdata Areas", "0"),
    ("Census Tracts", "10"),
    ("Census Block Groups", "12"),
    ("Census Blocks", "14"),
    ("Unified School Districts", "16"),
    ("Secondary School Districts", "18"),
    ("Elementary School Districts", "20"),
    ("Estates", "22"),
    ("County Subdivisions", "24"),
    ("Subbarrios", "26"),
    ("Consolidated Cities", "28"),
    ("Incorporated Places", "30"),
    ("Census Designated Places", "32"),
    ("Alaska Native Regional Corporations", "34"),
    ("Tribal Subdivisions", "36"),
    ("Federal American Indian Reservations", "38"),
    ("Off-Reservation Trust Lands", "40"),
    ("State American Indian Reservations", "42"),
    ("Hawaiian Home Lands", "44"),
    ("Alaska Native Village Statistical Areas", "46"),
    ("Oklahoma Tribal Statistical Areas", "48"),
    ("State Designated Tribal Statistical Areas", "50"),
    ("Tribal Designated Statistical Areas", "52"),
    ("American Indian Joint-Use Areas", "54"),
    ("111th Congressional Districts", "56"),
    ("2010 State Legislative Districts - Upper", "58"),
    ("2010 State Legislative Districts - Lower", "60"),
    ("Voting Districts", "62"),
    ("2010 Census Urbanized Areas", "64"),
    ("2010 Census Urban Clusters", "66"),
    ("Census Regions", "68"),
    ("Census Divisions", "70"),
    ("States", "72"),
    ("Counties", "74"),
    ("2010 Census ZIP Code Tabulation Areas", "76"),
];

/// Layer table for a canonical vintage name.
///
/// ACS 2017 vintages have no published layer listing; lookups against them
/// send no layer constraint.
pub fn layers(vintage: &str) -> Option<LayerTable> {
    match vintage {
        "Current_Current" | "Current_TAB2020" => Some(CURRENT_LAYERS),
        "Census2020_Current" | "Census2020_Census2020" | "Census2020_TAB2020" => {
            Some(CENSUS2020_LAYERS)
        }
        "ACS2019_Current" | "ACS2019_TAB2020" | "ACS2018_Current" | "ACS2018_TAB2020" => {
            Some(ACS_LAYERS)
        }
        "Census2010_Current" | "Census2010_Census2020" | "Census2010_TAB2020" => {
            Some(CENSUS2010_LAYERS)
        }
        _ => None,
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Canonical request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLookup {
    pub benchmark: &'static str,
    pub vintage: &'static str,
    /// Comma-separated layer IDs, `"all"`, or empty for no constraint.
    pub layers: String,
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    let key = key.trim();
    table
        .iter()
        .find(|(code, canonical)| code.eq_ignore_ascii_case(key) || *canonical == key)
        .map(|(_, canonical)| *canonical)
}

/// Canonical benchmark name for a short code.
pub fn resolve_benchmark(benchmark: &str) -> Result<&'static str> {
    lookup(BENCHMARKS, benchmark).ok_or_else(|| Error::UnrecognizedBenchmark(benchmark.to_string()))
}

/// Canonical vintage name for a short code within a canonical benchmark.
pub fn resolve_vintage(benchmark: &'static str, vintage: &str) -> Result<&'static str> {
    vintages(benchmark)
        .and_then(|table| lookup(table, vintage))
        .ok_or_else(|| Error::unrecognized_vintage(vintage, benchmark))
}

/// Layer IDs for a comma-separated list of categories within a canonical
/// vintage.
///
/// Unknown names are dropped. The result is empty when nothing matched or
/// the vintage has no layer table.
pub fn resolve_layers(vintage: &str, layers: &str) -> String {
    if layers.trim().eq_ignore_ascii_case("all") {
        return "all".to_string();
    }
    let Some(table) = self::layers(vintage) else {
        debug!(vintage, "No layer table for vintage, sending no layer constraint");
        return String::new();
    };

    let mut ids: Vec<&str> = Vec::new();
    for token in layers.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let found = table.iter().find(|(category, id)| {
            category.eq_ignore_ascii_case(token)
                || *id == token
                || crate::model::GeographyType::from_category(category)
                    .is_some_and(|ty| ty.slot().eq_ignore_ascii_case(token))
        });
        match found {
            Some((_, id)) if !ids.contains(id) => ids.push(*id),
            Some(_) => {}
            None => debug!(layer = token, vintage, "Dropping unknown layer"),
        }
    }
    ids.join(",")
}

/// Resolve short codes into the canonical parameters of a request.
pub fn resolve(benchmark: &str, vintage: &str, layers: &str) -> Result<ResolvedLookup> {
    let benchmark = resolve_benchmark(benchmark)?;
    let vintage = resolve_vintage(benchmark, vintage)?;
    let layers = resolve_layers(vintage, layers);
    Ok(ResolvedLookup {
        benchmark,
        vintage,
        layers,
    })
}

// ============================================================================
// Reverse Lookups
// ============================================================================

/// Short code of a canonical benchmark name.
pub fn benchmark_code(benchmark_name: &str) -> Option<&'static str> {
    BENCHMARKS
        .iter()
        .find(|(_, canonical)| *canonical == benchmark_name)
        .map(|(code, _)| *code)
}

/// Short code of a canonical vintage name.
///
/// Searched within `benchmark_name`'s vintages when it is a known benchmark,
/// across all benchmarks otherwise.
pub fn vintage_code(benchmark_name: Option<&str>, vintage_name: &str) -> Option<&'static str> {
    let find = |table: &'static [(&'static str, &'static str)]| {
        table
            .iter()
            .find(|(_, canonical)| *canonical == vintage_name)
            .map(|(code, _)| *code)
    };
    match benchmark_name.and_then(vintages) {
        Some(table) => find(table),
        None => BENCHMARKS
            .iter()
            .filter_map(|(_, canonical)| vintages(canonical))
            .find_map(find),
    }
}
