//! # HTTP Client Utilities
//!
//! Shared HTTP client for platform adapters.
//!
//! This module provides a reusable HTTP client wrapper with:
//! - Configurable timeouts
//! - Exponential backoff on retryable statuses ([`RetryPolicy`])
//! - JSON deserialization
//! - Status-to-[`PlatformError`] mapping
//!
//! # Examples
//!
//! ```ignore
//! use review_import::infrastructure::platforms::http_client::HttpClient;
//! use review_import::infrastructure::platforms::retry::RetryPolicy;
//!
//! let client = HttpClient::new(5000)?;
//! let body: MyResponse = client
//!     .fetch_with_retry(&RetryPolicy::default(), |c| c.get("https://api.example.com/search"))
//!     .await?;
//! ```

use crate::infrastructure::platforms::error::{PlatformError, PlatformResult};
use crate::infrastructure::platforms::retry::RetryPolicy;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Upper bound applied to a server-provided `Retry-After` hint.
const MAX_RETRY_AFTER_MS: u64 = 60_000;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP client wrapper for platform adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms` - Request timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InternalError` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> PlatformResult<Self> {
        Self::with_headers(timeout_ms, HeaderMap::new())
    }

    /// Creates a new HTTP client with headers sent on every request.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms` - Request timeout in milliseconds.
    /// * `default_headers` - Headers included in all requests.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InternalError` if the client cannot be created.
    pub fn with_headers(timeout_ms: u64, default_headers: HeaderMap) -> PlatformResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                PlatformError::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Sends the request produced by `build`, retrying per `policy`, and
    /// deserializes a successful JSON body.
    ///
    /// `build` is invoked once per attempt so the request can be rebuilt.
    /// A `Retry-After` header larger than the computed backoff is honored.
    ///
    /// # Arguments
    ///
    /// * `policy` - Backoff applied to retryable statuses.
    /// * `build` - Builds the request from the shared client.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::RateLimited` when retries are exhausted on
    /// 429, a status-specific error for other non-2xx responses,
    /// `PlatformError::Timeout`/`Connection` on transport failure, and
    /// `PlatformError::ProtocolError` if the body is not the expected JSON.
    pub async fn fetch_with_retry<T, F>(&self, policy: &RetryPolicy, build: F) -> PlatformResult<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt: u32 = 0;
        loop {
            let response = build(&self.client)
                .send()
                .await
                .map_err(|e| self.map_reqwest_error(e))?;

            let status = response.status();
            if status.is_success() {
                return self.parse_json(response).await;
            }

            let retry_after_ms = retry_after_ms(&response);
            if policy.should_retry(status, attempt) {
                let backoff = policy.delay_for(attempt);
                let delay = retry_after_ms
                    .map(Duration::from_millis)
                    .map_or(backoff, |hint| hint.max(backoff));
                debug!(
                    status = status.as_u16(),
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retryable status, backing off"
                );
                drop(response);
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(self.map_status_error(status, &body, retry_after_ms));
        }
    }

    /// GET with query parameters and headers, retried per `policy`.
    ///
    /// # Arguments
    ///
    /// * `url` - The endpoint URL.
    /// * `params` - Query parameters.
    /// * `headers` - Extra headers for this request.
    /// * `policy` - Backoff applied to retryable statuses.
    ///
    /// # Errors
    ///
    /// See [`fetch_with_retry`](Self::fetch_with_retry).
    pub async fn get_json<T, P>(
        &self,
        url: &str,
        params: &P,
        headers: &HeaderMap,
        policy: &RetryPolicy,
    ) -> PlatformResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        self.fetch_with_retry(policy, |client| {
            client.get(url).query(params).headers(headers.clone())
        })
        .await
    }

    async fn parse_json<T: DeserializeOwned>(&self, response: Response) -> PlatformResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| {
                PlatformError::protocol_error(format!(
                    "Failed to parse response: {}",
                    e.without_url()
                ))
            })
    }

    /// Maps a reqwest error to a PlatformError. The request URL is dropped
    /// because it can carry an API key in its query string.
    fn map_reqwest_error(&self, error: reqwest::Error) -> PlatformError {
        let error = error.without_url();
        if error.is_timeout() {
            PlatformError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            PlatformError::connection(format!("Connection failed: {}", error))
        } else {
            PlatformError::connection(format!("HTTP request failed: {}", error))
        }
    }

    /// Maps a final non-2xx status to a PlatformError.
    fn map_status_error(
        &self,
        status: StatusCode,
        body: &str,
        retry_after_ms: Option<u64>,
    ) -> PlatformError {
        let body = truncate(body);
        match status {
            StatusCode::TOO_MANY_REQUESTS => match retry_after_ms {
                Some(ms) => PlatformError::rate_limited_with_retry("Rate limit exceeded", ms),
                None => PlatformError::rate_limited("Rate limit exceeded"),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                PlatformError::authentication(format!("Authentication failed: {}", body))
            }
            StatusCode::BAD_REQUEST => {
                PlatformError::invalid_request(format!("Bad request: {}", body))
            }
            _ => PlatformError::http(status.as_u16(), format!("{}: {}", status, body)),
        }
    }
}

/// Reads a `Retry-After` header given in whole seconds.
fn retry_after_ms(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000).min(MAX_RETRY_AFTER_MS))
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
