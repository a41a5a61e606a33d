//! # Platform Adapter Trait
//!
//! Port definition for review platform integrations.
//!
//! This module defines the [`PlatformAdapter`] trait that every review
//! platform integration implements. The aggregator holds a list of
//! adapters and calls them uniformly; platform-specific behavior lives
//! only inside each implementation.
//!
//! # Examples
//!
//! ```ignore
//! use review_import::infrastructure::platforms::traits::PlatformAdapter;
//!
//! struct MyPlatformAdapter { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl PlatformAdapter for MyPlatformAdapter {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::SearchResult;
use crate::domain::value_objects::Platform;
use crate::infrastructure::platforms::error::{PlatformError, PlatformResult};
use crate::infrastructure::platforms::retry::RetryPolicy;
use async_trait::async_trait;
use std::fmt;

/// Default cap on places fetched during the detail phase.
pub const DEFAULT_MAX_PLACES: usize = 5;

/// Default per-request HTTP timeout in milliseconds.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Connection settings for one platform adapter.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// API root, without a trailing endpoint path.
    pub base_url: String,
    /// Maximum places to fetch details for.
    pub max_places: usize,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Backoff policy for rate-limited calls.
    pub retry: RetryPolicy,
}

impl PlatformConfig {
    /// Creates a configuration pointing at `base_url` with default limits.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root; tests point this at a mock server.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_places: DEFAULT_MAX_PLACES,
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            retry: RetryPolicy::default(),
        }
    }

    /// Sets the place cap.
    ///
    /// # Arguments
    ///
    /// * `max_places` - Places whose reviews are fetched per search.
    #[must_use]
    pub fn with_max_places(mut self, max_places: usize) -> Self {
        self.max_places = max_places;
        self
    }

    /// Sets the per-request timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms` - Request timeout in milliseconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Trait defining the interface for review platform adapters.
///
/// # Error Handling
///
/// `search_businesses` returns `PlatformResult<T>`. A failure of the
/// search phase fails the call; a failure fetching one place's reviews
/// only drops that place.
#[async_trait]
pub trait PlatformAdapter: Send + Sync + fmt::Debug {
    /// Returns the platform this adapter talks to.
    fn platform(&self) -> Platform;

    /// Searches the platform and returns normalized places with reviews.
    ///
    /// Places without reviews may be included; callers filter them.
    ///
    /// # Errors
    ///
    /// - `PlatformError::RateLimited` - still rate limited after retries
    /// - `PlatformError::Authentication` - credential rejected
    /// - `PlatformError::ProtocolError` - unexpected payload
    /// - `PlatformError::Timeout` / `Connection` - transport failure
    async fn search_businesses(&self, query: &str) -> PlatformResult<Vec<SearchResult>>;
}

/// Returns the trimmed key, or a configuration error if it is absent or
/// blank.
pub(crate) fn require_api_key(platform: Platform, api_key: Option<&str>) -> PlatformResult<String> {
    match api_key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(PlatformError::missing_credential(platform)),
    }
}
