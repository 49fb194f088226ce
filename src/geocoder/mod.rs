//! Request orchestration for the Census Geocoder API.
//!
//! - [`resolver`]: benchmark, vintage and layer names to API parameters
//! - [`transport`]: the HTTP seam, with retries
//! - [`classify`]: response status and payload to success or error
//! - [`batch`]: batch file checks and CSV results
//! - [`client`]: the [`Geocoder`] itself

pub mod batch;
pub mod classify;
pub mod client;
pub mod resolver;
pub mod transport;

pub use client::{AddressQuery, EntityType, Geocoder, LookupOptions};
pub use resolver::ResolvedLookup;
pub use transport::{HttpResponse, HttpTransport, RetryPolicy, Transport};
