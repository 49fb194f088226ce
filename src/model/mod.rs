//! Typed entities for Census Geocoder responses.
//!
//! Defines the entities returned by the geocoder: [`Location`] (one lookup
//! result), [`MatchedAddress`] (one candidate match), [`GeographicArea`] (one
//! Census geography, tagged with its [`GeographyType`]) and
//! [`GeographyCollection`] (all geographies attached to a match or a
//! coordinate lookup).
//!
//! Every entity can be built from the wire shape with `from_dict`/`from_json`,
//! from a batch CSV row with `from_csv_record`, and serialized back with
//! `to_dict`/`to_json`. For well-formed payloads `from_dict(to_dict(x)) == x`.
//!
//! # Wire Keys
//!
//! Attributes have a library name (`state_fips_code`) and a wire key
//! (`STATE`). `inspect(true)` reports wire keys, `inspect(false)` library
//! names. Keys the model does not know are kept in each entity's
//! `extensions` map and written back unchanged.

/// Getter and validated setter pairs for plain text attributes.
macro_rules! text_accessors {
    ($( $field:ident, $setter:ident; )+) => {
        $(
            pub fn $field(&self) -> Option<&str> {
                self.$field.as_deref()
            }

            pub fn $setter(
                &mut self,
                value: impl Into<serde_json::Value>,
            ) -> Result<(), $crate::model::ModelError> {
                self.$field = $crate::model::coerce::text(stringify!($field), &value.into())?;
                Ok(())
            }
        )+
    };
}

pub mod address;
pub mod codes;
pub(crate) mod coerce;
pub mod collection;
pub mod geography;
pub mod location;
pub mod taxonomy;

pub use address::MatchedAddress;
pub use codes::LsadCategory;
pub use collection::GeographyCollection;
pub use geography::GeographicArea;
pub use location::Location;
pub use taxonomy::GeographyType;

use serde_json::Value;

/// Errors raised while validating values or reading wire payloads.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Expected a JSON object for {0}")]
    NotAnObject(String),

    #[error("Slot {slot} holds {expected} geographies, got {actual}")]
    GeographyMismatch {
        slot: &'static str,
        expected: GeographyType,
        actual: GeographyType,
    },

    #[error("Unknown geography slot: {0}")]
    UnknownSlot(String),

    #[error("CSV record too short: expected at least {expected} columns, got {actual}")]
    ShortRecord { expected: usize, actual: usize },

    #[error("{0} cannot be built from a CSV record")]
    Unsupported(&'static str),

    #[error("Invalid JSON: {0}")]
    Json(String),
}

impl ModelError {
    /// Create an invalid-value error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Behaviour shared by every geocoder entity.
pub trait CensusEntity {
    /// API path segment (or descriptive tag) for this kind of entity.
    fn entity_type(&self) -> &'static str;

    /// Serialize to the wire shape.
    fn to_dict(&self) -> Value;

    /// Names of the populated attributes, as wire keys when
    /// `as_census_fields` is set, library names otherwise.
    fn inspect(&self, as_census_fields: bool) -> Vec<String>;

    /// Serialize to a JSON string.
    fn to_json(&self) -> String {
        self.to_dict().to_string()
    }
}

/// Entities that can be parsed without extra context.
///
/// [`GeographicArea`] is not one of them: it needs its [`GeographyType`],
/// see [`GeographyType::parse`].
pub trait FromWire: Sized {
    /// Build from the wire shape.
    fn from_dict(value: &Value) -> Result<Self, ModelError>;

    /// Build from one row of a batch response.
    fn from_csv_record(record: &[String]) -> Result<Self, ModelError>;

    /// Build from a JSON string.
    fn from_json(json: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_dict(&value)
    }
}
