//! HTTP transport abstraction
//!
//! The client never talks to the network directly: it hands a fully built
//! [`HttpRequest`] to a [`Transport`]. [`HttpTransport`] is the reqwest-based
//! implementation used by default; tests and alternative HTTP stacks plug in
//! their own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::client::ClientConfig;
use crate::error::{RestError, RestResult};

/// Content type of every Kraken REST request body
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// Request could not be completed (connection, DNS, TLS)
    #[error("request failed: {0}")]
    Request(String),

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// A POST request ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL
    pub url: String,
    /// Form-encoded body
    pub body: String,
    /// Extra headers (authentication for private calls)
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Create a request without extra headers
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Trait for HTTP transport abstraction
///
/// Implementations POST the request with
/// `Content-Type: application/x-www-form-urlencoded` and return the raw
/// response body. HTTP status codes are not interpreted here; Kraken reports
/// failures inside the JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a POST request and return the response body
    async fn post(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError>;
}

/// reqwest-based transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the HTTP client from the configuration
    ///
    /// # Errors
    /// Returns [`RestError::CapabilityUnavailable`] if the HTTP client cannot
    /// be initialised (for example, no TLS backend could be loaded).
    pub fn new(config: &ClientConfig) -> RestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(!config.ssl_verify)
            .build()
            .map_err(|e| RestError::CapabilityUnavailable(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn post(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        let mut builder = self
            .client
            .post(&request.url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(%status, len = bytes.len(), "Received response");

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_headers() {
        let request = HttpRequest::new("https://api.kraken.com/0/private/Balance", "nonce=1")
            .with_header("API-Key", "key")
            .with_header("API-Sign", "sig");

        assert_eq!(request.header("api-key"), Some("key"));
        assert_eq!(request.header("API-Sign"), Some("sig"));
        assert_eq!(request.header("Content-Type"), None);
    }

    #[test]
    fn test_transport_builds_with_defaults() {
        let transport = HttpTransport::new(&ClientConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_transport_builds_without_cert_verification() {
        let config = ClientConfig::default().with_ssl_verify(false);
        assert!(HttpTransport::new(&config).is_ok());
    }
}
