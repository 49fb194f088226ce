//! Census Geocoder - a typed client for the US Census Bureau Geocoder API.
//!
//! Looks up one-line addresses, parametrized addresses, coordinate pairs and
//! batch files, and parses the responses into typed entities: [`Location`],
//! [`MatchedAddress`], [`GeographyCollection`] and [`GeographicArea`].

pub mod config;
pub mod error;
pub mod geocoder;
pub mod model;
#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use error::{Error, Result};
pub use geocoder::{AddressQuery, EntityType, Geocoder, LookupOptions};
pub use model::{
    CensusEntity, FromWire, GeographicArea, GeographyCollection, GeographyType, Location,
    MatchedAddress,
};
