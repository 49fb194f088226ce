//! Crate-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI binary uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level error enum returned by the geocoder operations
//! - [`ModelError`]: value validation and wire-shape errors raised by the
//!   entity model, converted into [`Error::Model`] with `?`
//! - Configuration problems (bad benchmark, bad vintage, missing address,
//!   unusable batch file) are grouped by [`Error::is_configuration`]
//!
//! # Example
//!
//! ```ignore
//! use census_geocoder::error::{Error, Result};
//!
//! fn lookup(geocoder: &Geocoder) -> Result<Location> {
//!     let query = AddressQuery::one_line("4600 Silver Hill Rd, Washington, DC 20233");
//!     geocoder.from_address(EntityType::Locations, &query, &LookupOptions::default())
//! }
//! ```

use std::path::PathBuf;

use crate::geocoder::batch::MAX_BATCH_RECORDS;
pub use crate::model::ModelError;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level geocoder error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Benchmark name is not in the benchmark table
    #[error("Benchmark ({0}) is not a recognized benchmark")]
    UnrecognizedBenchmark(String),

    /// Vintage name is not available within the resolved benchmark
    #[error(
        "Vintage ({vintage}) is not a recognized/available vintage within the \"{benchmark}\" benchmark"
    )]
    UnrecognizedVintage { vintage: String, benchmark: String },

    /// No usable address input was supplied
    #[error("No address information supplied: {0}")]
    NoAddress(String),

    /// Batch lookup without a file
    #[error("No batch file provided")]
    NoFileProvided,

    /// Batch file does not exist
    #[error("Batch file not found: {0}")]
    FileNotFound(PathBuf),

    /// Batch file holds more records than the service accepts
    #[error(
        "Batch too large. Max of {max} entries supported. File contains {0}",
        max = MAX_BATCH_RECORDS
    )]
    BatchSizeTooLarge(usize),

    /// Service rejected the batch file contents
    #[error("Malformed batch file: {0}")]
    MalformedBatchFile(String),

    /// Lookup succeeded but matched nothing
    #[error("No geographic entity found: {0}")]
    EntityNotFound(String),

    /// Service returned an error status
    #[error("Census Geocoder API returned status code {status} with message: \"{body}\"")]
    CensusApi { status: u16, body: String },

    /// Request could not be built from the supplied configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network failure after all retries were exhausted
    #[error("Transport error: {0}")]
    Transport(String),

    /// Entity validation or payload shape error
    #[error(transparent)]
    Model(#[from] ModelError),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Batch CSV could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Response body was not valid JSON
    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an unrecognized-vintage error.
    pub fn unrecognized_vintage(vintage: impl Into<String>, benchmark: impl Into<String>) -> Self {
        Self::UnrecognizedVintage {
            vintage: vintage.into(),
            benchmark: benchmark.into(),
        }
    }

    /// Create a no-address error.
    pub fn no_address(message: impl Into<String>) -> Self {
        Self::NoAddress(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::EntityNotFound(message.into())
    }

    /// Create an API status error.
    pub fn census_api(status: u16, body: impl Into<String>) -> Self {
        Self::CensusApi {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error is caused by the request's own inputs rather than
    /// the service or the network.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::UnrecognizedBenchmark(_)
            | Self::UnrecognizedVintage { .. }
            | Self::NoAddress(_)
            | Self::NoFileProvided
            | Self::FileNotFound(_)
            | Self::BatchSizeTooLarge(_)
            | Self::MalformedBatchFile(_)
            | Self::Configuration(_) => true,
            Self::WithContext { source, .. } => source.is_configuration(),
            _ => false,
        }
    }

    /// Whether the lookup simply found nothing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::EntityNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, csv::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Csv(e).context(ctx))
    }
}
