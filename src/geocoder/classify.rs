//! Response classification.
//!
//! Turns a raw [`HttpResponse`] into either a payload to parse or one of the
//! geocoder errors. The service reports "nothing matched" in several ways:
//! a 404, an empty JSON object, or a normal result with no matches and no
//! geographies. All of them become [`Error::EntityNotFound`].

use serde_json::Value;
use tracing::debug;

use super::transport::HttpResponse;
use crate::error::{Error, Result};

/// Which endpoint produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    OneLine,
    Address,
    Coordinates,
    Batch,
}

impl RequestKind {
    /// Endpoint path segment.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::OneLine => "onelineaddress",
            Self::Address => "address",
            Self::Coordinates => "coordinates",
            Self::Batch => "addressbatch",
        }
    }
}

/// Whether a parsed payload means no entity was found.
pub fn is_not_found(payload: &Value) -> bool {
    if payload.as_object().is_some_and(|obj| obj.is_empty()) {
        return true;
    }
    let result = payload.get("result").unwrap_or(&Value::Null);

    let has_matches = result
        .get("addressMatches")
        .and_then(Value::as_array)
        .is_some_and(|matches| !matches.is_empty());
    let has_geographies = result
        .get("geographies")
        .and_then(Value::as_object)
        .is_some_and(|categories| {
            categories
                .values()
                .any(|areas| areas.as_array().is_some_and(|a| !a.is_empty()))
        });

    !has_matches && !has_geographies
}

/// Error for a response whose status already rules out success, if any.
fn status_error(kind: RequestKind, response: &HttpResponse) -> Option<Error> {
    if response.status == 404 {
        return Some(Error::not_found(format!(
            "{} lookup returned 404",
            kind.endpoint()
        )));
    }
    if response.status < 400 {
        return None;
    }

    let body = response.text();
    let lowered = body.to_lowercase();
    match kind {
        RequestKind::OneLine if lowered.contains("specify street") => Some(Error::config(
            format!("The service could not read the one-line address: {}", body.trim()),
        )),
        RequestKind::Batch if lowered.contains("malformed") => {
            Some(Error::MalformedBatchFile(body.trim().to_string()))
        }
        _ => Some(Error::census_api(response.status, body)),
    }
}

/// Classify a JSON response and return its payload.
pub fn classify_json(kind: RequestKind, response: &HttpResponse) -> Result<Value> {
    if let Some(err) = status_error(kind, response) {
        return Err(err);
    }
    let payload = response.json()?;
    if is_not_found(&payload) {
        debug!(endpoint = kind.endpoint(), "No match in response");
        return Err(Error::not_found(format!(
            "{} lookup matched nothing",
            kind.endpoint()
        )));
    }
    Ok(payload)
}

/// Classify a batch response and return its CSV body.
pub fn classify_batch(response: &HttpResponse) -> Result<String> {
    if let Some(err) = status_error(RequestKind::Batch, response) {
        return Err(err);
    }
    let body = response.text();
    // Unreadable uploads come back as the HTML upload form.
    if body.trim_start().starts_with('<') {
        return Err(Error::MalformedBatchFile(
            "the service returned an HTML page instead of results".to_string(),
        ));
    }
    Ok(body)
}
