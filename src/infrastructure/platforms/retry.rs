//! # Retry Policy
//!
//! Exponential backoff parameters shared by all platform adapters.
//!
//! Attempt `n` (counting from zero) that receives a retryable status waits
//! `base_delay * 2^n` before the next attempt, up to `max_retries` retries.
//! With the defaults a call that keeps getting 429 waits 1 s, 2 s and 4 s
//! before giving up.
//!
//! # Examples
//!
//! ```
//! use review_import::infrastructure::platforms::retry::RetryPolicy;
//! use reqwest::StatusCode;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::default();
//! assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
//! assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
//! assert!(policy.should_retry(StatusCode::TOO_MANY_REQUESTS, 2));
//! assert!(!policy.should_retry(StatusCode::TOO_MANY_REQUESTS, 3));
//! assert!(!policy.should_retry(StatusCode::INTERNAL_SERVER_ERROR, 0));
//! ```

use reqwest::StatusCode;
use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Retries only on `429 Too Many Requests`.
#[must_use]
pub fn is_rate_limited(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
}

/// Backoff policy consumed by
/// [`HttpClient::fetch_with_retry`](super::http_client::HttpClient::fetch_with_retry).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Which statuses are worth retrying.
    pub retryable: fn(StatusCode) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            retryable: is_rate_limited,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given limits, retrying on 429 only.
    #[must_use]
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            retryable: is_rate_limited,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(0, 0)
    }

    /// Replaces the retryable-status predicate.
    #[must_use]
    pub fn with_retryable(mut self, retryable: fn(StatusCode) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Returns the delay to wait after failed attempt `attempt`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Returns true if `status` on attempt `attempt` should be retried.
    #[must_use]
    pub fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        attempt < self.max_retries && (self.retryable)(status)
    }
}
