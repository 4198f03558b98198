//! HTTP client abstraction for testability.
//!
//! The query client, size probe and downloader only talk to the network
//! through `HttpClient`, so tests can substitute an in-memory server.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE, RANGE};

use crate::config::ServiceConfig;
use crate::error::{UpdateError, UpdateResult};

/// Fully buffered response (used for the query).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Metadata-only response (used for the size probe).
#[derive(Debug, Clone, PartialEq)]
pub struct HeadResponse {
    pub status: u16,
    pub content_length: Option<u64>,
}

/// Streaming response (used for the download).
pub struct BodyStream {
    pub status: u16,
    pub content_length: Option<u64>,
    pub body: Box<dyn Read + Send>,
}

impl std::fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyStream")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Trait for HTTP client operations.
pub trait HttpClient: Send + Sync {
    /// POST a JSON payload and buffer the response body.
    fn post_json(&self, url: &str, payload: Vec<u8>) -> UpdateResult<HttpResponse>;

    /// HEAD request, returning status and `Content-Length`.
    fn head(&self, url: &str) -> UpdateResult<HeadResponse>;

    /// GET request, optionally restricted to `bytes=<range_start>-`.
    fn get(&self, url: &str, range_start: Option<u64>) -> UpdateResult<BodyStream>;
}

/// Real HTTP client implementation using reqwest.
///
/// Holds two clients: one bounded by the request timeout for the query and
/// probes, and one with only a connect timeout for long transfers.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    transfer_client: Client,
}

impl ReqwestClient {
    /// Create clients with the timeouts from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> UpdateResult<Self> {
        Self::with_timeouts(config.request_timeout, config.connect_timeout)
    }

    /// Create clients with explicit timeouts.
    pub fn with_timeouts(
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> UpdateResult<Self> {
        let user_agent = concat!("vinupdate/", env!("CARGO_PKG_VERSION"));

        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| UpdateError::Config(format!("failed to create HTTP client: {}", e)))?;

        let transfer_client = Client::builder()
            .timeout(None::<Duration>)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| UpdateError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            transfer_client,
        })
    }
}

fn header_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
}

impl HttpClient for ReqwestClient {
    fn post_json(&self, url: &str, payload: Vec<u8>) -> UpdateResult<HttpResponse> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .map_err(|e| UpdateError::network(url, &e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| UpdateError::network(url, &e))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }

    fn head(&self, url: &str) -> UpdateResult<HeadResponse> {
        let response = self
            .client
            .head(url)
            .send()
            .map_err(|e| UpdateError::network(url, &e))?;

        Ok(HeadResponse {
            status: response.status().as_u16(),
            content_length: header_content_length(response.headers()),
        })
    }

    fn get(&self, url: &str, range_start: Option<u64>) -> UpdateResult<BodyStream> {
        let mut request = self.transfer_client.get(url);
        if let Some(start) = range_start {
            request = request.header(RANGE, format!("bytes={}-", start));
        }

        let response: Response = request.send().map_err(|e| UpdateError::network(url, &e))?;
        let status = response.status().as_u16();
        let content_length =
            header_content_length(response.headers()).or_else(|| response.content_length());

        Ok(BodyStream {
            status,
            content_length,
            body: Box::new(response),
        })
    }
}
