//! HTTP transport for the geocoder.
//!
//! [`Transport`] is the seam between request orchestration and the network.
//! [`HttpTransport`] is the production implementation on a blocking reqwest
//! client. Tests substitute [`mocks::MockTransport`].
//!
//! Only transport failures (connection errors, timeouts, unreadable bodies)
//! are retried. Any response that arrives is returned as-is, whatever its
//! status code, so the caller can classify it.

use std::time::Duration;

use reqwest::blocking::multipart;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// User agent sent with every request
const USER_AGENT: &str = concat!("census-geocoder/", env!("CARGO_PKG_VERSION"));

/// First retry delay, doubled on each further attempt.
const INITIAL_DELAY: Duration = Duration::from_millis(500);

/// Raw response from the service.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// A file sent as one multipart part.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    /// Form field name
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Trait for the HTTP calls the geocoder makes.
///
/// Implement this trait to create mock implementations for testing.
pub trait Transport: Send + Sync {
    /// Send a GET request with query parameters.
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<HttpResponse>;

    /// Send a multipart POST with text fields and one file part.
    fn post_multipart(
        &self,
        url: &str,
        params: &[(&str, String)],
        upload: &Upload,
    ) -> Result<HttpResponse>;
}

// ============================================================================
// Retry Policy
// ============================================================================

/// How often, and how patiently, to retry a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_tries: u32,
    /// Ceiling on the delay between two attempts
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_tries: 5,
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_tries: u32, max_delay: Duration) -> Self {
        Self {
            max_tries: max_tries.max(1),
            max_delay,
        }
    }

    /// Delay before retrying after failed attempt number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        INITIAL_DELAY
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `send` until it succeeds or the attempts run out.
    pub fn run<T, E, F>(&self, what: &str, mut send: F) -> Result<T>
    where
        E: std::fmt::Display,
        F: FnMut() -> std::result::Result<T, E>,
    {
        let max_tries = self.max_tries.max(1);
        let mut attempt = 1;
        loop {
            match send() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_tries => {
                    let delay = self.delay(attempt);
                    warn!(
                        request = what,
                        attempt,
                        max_tries,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed, retrying: {}",
                        e
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(Error::transport(format!(
                        "{what} failed after {attempt} attempt(s): {e}"
                    )));
                }
            }
        }
    }
}

// ============================================================================
// Reqwest Transport
// ============================================================================

/// Blocking reqwest transport with retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport with the given retry policy.
    pub fn new(retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| Error::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, retry })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn read(response: reqwest::blocking::Response) -> reqwest::Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<HttpResponse> {
        debug!(url, ?params, "GET");
        let response = self.retry.run(url, || {
            self.client
                .get(url)
                .query(params)
                .send()
                .and_then(Self::read)
        })?;
        debug!(url, status = response.status, bytes = response.body.len(), "Response received");
        Ok(response)
    }

    fn post_multipart(
        &self,
        url: &str,
        params: &[(&str, String)],
        upload: &Upload,
    ) -> Result<HttpResponse> {
        debug!(url, ?params, file = %upload.file_name, bytes = upload.bytes.len(), "POST multipart");
        let response = self.retry.run(url, || {
            // Forms are consumed by send, so each attempt builds its own.
            let mut form = multipart::Form::new();
            for (name, value) in params {
                form = form.text(name.to_string(), value.clone());
            }
            let part = multipart::Part::bytes(upload.bytes.clone())
                .file_name(upload.file_name.clone());
            form = form.part(upload.field.clone(), part);

            self.client
                .post(url)
                .multipart(form)
                .send()
                .and_then(Self::read)
        })?;
        debug!(url, status = response.status, bytes = response.body.len(), "Response received");
        Ok(response)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delay_doubles_then_caps() {
        let policy = RetryPolicy::new(5, Duration::from_secs(10));
        assert_eq!(policy.delay(1), Duration::from_millis(500));
        assert_eq!(policy.delay(2), Duration::from_secs(1));
        assert_eq!(policy.delay(3), Duration::from_secs(2));
        assert_eq!(policy.delay(6), Duration::from_secs(10));
        assert_eq!(policy.delay(40), Duration::from_secs(10));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_tries, 5);
        assert_eq!(policy.max_delay, Duration::from_secs(10));
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_tries, 1);
    }

    #[test]
    fn test_retry_until_success() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let mut calls = 0;
        let value = policy
            .run("test", || {
                calls += 1;
                if calls < 3 { Err("connection reset") } else { Ok(calls) }
            })
            .unwrap();
        assert_eq!(value, 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_retry_gives_up() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let mut calls = 0;
        let err = policy
            .run("test", || -> std::result::Result<(), &str> {
                calls += 1;
                Err("timed out")
            })
            .unwrap_err();
        assert_eq!(calls, 3);
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_response_helpers() {
        let response = HttpResponse::new(200, r#"{"result": {}}"#);
        assert_eq!(response.json().unwrap(), json!({"result": {}}));
        assert_eq!(response.text(), r#"{"result": {}}"#);
        assert!(HttpResponse::new(200, "<html>").json().is_err());
    }

    #[test]
    fn test_client_creation() {
        let transport = HttpTransport::new(RetryPolicy::default()).unwrap();
        assert_eq!(transport.retry_policy().max_tries, 5);
        assert!(USER_AGENT.starts_with("census-geocoder/"));
    }

    #[test]
    fn test_mock_records_requests() {
        let mock = mocks::MockTransport::with_json(200, &json!({}));
        mock.get("http://localhost/a", &[("format", "json".to_string())])
            .unwrap();
        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].param("format"), Some("json"));
    }
}
