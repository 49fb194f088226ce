//! Census code tables.
//!
//! - FUNCSTAT: functional status of a governmental or statistical entity
//! - LSAD: legal/statistical area descriptor, the word that goes with an
//!   entity's name ("County", "city", "CDP"). Descriptors marked `(prefix)`
//!   precede the name, `(suffix)` follow it, and `(balance)` marks the part
//!   of a consolidated government outside its separately incorporated places.
//!
//! See <https://www.census.gov/library/reference/code-lists/functional-status-codes.html>
//! and <https://www.census.gov/library/reference/code-lists/legal-status-codes.html>.

use std::fmt;

/// FUNCSTAT code → definition.
pub const FUNCSTAT: &[(&str, &str)] = &[
    (
        "A",
        "Active government providing primary general-purpose functions",
    ),
    (
        "B",
        "Active government that is partially consolidated with another government but with separate officials providing primary general-purpose functions",
    ),
    (
        "C",
        "Active government that is consolidated with another government with a single set of officials",
    ),
    ("E", "Active government providing special-purpose functions"),
    (
        "F",
        "Fictitious entity created to fill the Census Bureau geographic hierarchy",
    ),
    (
        "G",
        "Active government that is subordinate to another unit of government",
    ),
    (
        "I",
        "Inactive governmental unit that has the power to provide primary special-purpose functions",
    ),
    (
        "L",
        "Inactive, nonfunctioning legal real property entity with potential quasi-legal administrative functions",
    ),
    (
        "M",
        "Active legal real property entity with quasi-legal functions",
    ),
    ("N", "Nonfunctioning legal entity"),
    ("S", "Statistical entity"),
    (
        "T",
        "Active state-recognized entity with quasi-legal functions",
    ),
];

/// LSAD code → descriptor.
///
/// Not exhaustive. Codes missing from this table are still accepted and
/// stored verbatim on the entity; they just have no descriptor.
pub const LSAD: &[(&str, &str)] = &[
    ("03", "City and Borough (suffix)"),
    ("04", "Borough (suffix)"),
    ("05", "Census Area (suffix)"),
    ("06", "County (suffix)"),
    ("07", "District (suffix)"),
    ("10", "Island (suffix)"),
    ("12", "Municipality (suffix)"),
    ("13", "Municipio (suffix)"),
    ("15", "Parish (suffix)"),
    ("20", "barrio (suffix)"),
    ("21", "borough (suffix)"),
    ("22", "CCD (suffix)"),
    ("23", "census subarea (suffix)"),
    ("24", "census subdistrict (suffix)"),
    ("25", "city (suffix)"),
    ("26", "county (suffix)"),
    ("27", "district (suffix)"),
    ("28", "District (prefix)"),
    ("29", "precinct (suffix)"),
    ("30", "Precinct (prefix)"),
    ("31", "gore (suffix)"),
    ("32", "grant (suffix)"),
    ("36", "location (suffix)"),
    ("37", "municipality (suffix)"),
    ("39", "plantation (suffix)"),
    ("41", "barrio-pueblo (suffix)"),
    ("42", "purchase (suffix)"),
    ("43", "town (suffix)"),
    ("44", "township (suffix)"),
    ("45", "Township (prefix)"),
    ("46", "UT (suffix)"),
    ("47", "village (suffix)"),
    ("49", "charter township (suffix)"),
    ("51", "subbarrio (suffix)"),
    ("53", "city and borough (suffix)"),
    ("54", "comunidad (suffix)"),
    ("57", "CDP (suffix)"),
    ("62", "zona urbana (suffix)"),
    ("BG", "Block Group (prefix)"),
    ("BK", "Block (prefix)"),
    ("C1", "Congressional District (at Large)"),
    ("C2", "Congressional District"),
    ("C3", "Resident Commissioner District (at Large)"),
    ("C4", "Delegate District (at Large)"),
    ("CG", "consolidated government (balance)"),
    ("CT", "Census Tract (prefix)"),
    ("LL", "State Legislative District (lower chamber)"),
    ("LU", "State Legislative District (upper chamber)"),
    ("M1", "Metropolitan Statistical Area"),
    ("M2", "Micropolitan Statistical Area"),
    ("M3", "Metropolitan Division"),
    ("M4", "Combined Statistical Area"),
    ("M5", "Metropolitan New England City and Town Area"),
    ("M6", "Micropolitan New England City and Town Area"),
    ("M7", "New England City and Town Area Division"),
    ("M8", "Combined New England City and Town Area"),
    ("MG", "metropolitan government (balance)"),
    ("MT", "metro government (balance)"),
    ("UC", "urban county (balance)"),
    ("UG", "unified government (balance)"),
    ("V1", "Voting District"),
    ("Z5", "5-Digit ZIP Code Tabulation Area"),
];

/// Where an LSAD descriptor goes relative to the entity name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LsadCategory {
    Unspecified,
    Prefix,
    Suffix,
    Balance,
}

impl LsadCategory {
    /// Classify a descriptor by its annotation.
    pub fn of(descriptor: &str) -> Self {
        if descriptor.contains("(prefix)") {
            Self::Prefix
        } else if descriptor.contains("(suffix)") {
            Self::Suffix
        } else if descriptor.contains("(balance)") {
            Self::Balance
        } else {
            Self::Unspecified
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "Unspecified",
            Self::Prefix => "Prefix",
            Self::Suffix => "Suffix",
            Self::Balance => "Balance",
        }
    }
}

impl fmt::Display for LsadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of a FUNCSTAT code.
pub fn funcstat_description(code: &str) -> Option<&'static str> {
    FUNCSTAT
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| *description)
}

/// Raw LSAD descriptor, annotation included.
pub fn lsad_label(code: &str) -> Option<&'static str> {
    LSAD.iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// LSAD descriptor with its `(prefix)`/`(suffix)`/`(balance)` annotation removed.
pub fn lsad_descriptor(code: &str) -> Option<String> {
    lsad_label(code).map(|label| {
        label
            .replace(" (suffix)", "")
            .replace(" (prefix)", "")
            .replace(" (balance)", "")
    })
}
