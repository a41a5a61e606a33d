//! # Platform Errors
//!
//! Error types for platform adapter operations.
//!
//! Every variant maps to one [`ErrorKind`]: construction-time credential
//! problems are `CONFIG_ERROR`, everything raised by an outbound call is
//! `API_ERROR`.
//!
//! # Examples
//!
//! ```
//! use review_import::domain::errors::ErrorKind;
//! use review_import::infrastructure::platforms::error::PlatformError;
//!
//! let error = PlatformError::rate_limited("Rate limit exceeded");
//! assert_eq!(error.status(), Some(429));
//! assert_eq!(error.kind(), ErrorKind::ApiError);
//!
//! let error = PlatformError::missing_credential(review_import::domain::value_objects::Platform::Yelp);
//! assert_eq!(error.kind(), ErrorKind::ConfigError);
//! ```

use crate::domain::errors::ErrorKind;
use crate::domain::value_objects::Platform;
use thiserror::Error;

/// Error type for platform adapter operations.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// Adapter could not be constructed (missing or blank credential).
    #[error("platform configuration error: {platform} - {message}")]
    Configuration {
        /// The affected platform.
        platform: Platform,
        /// Error message.
        message: String,
    },

    /// Request timed out.
    #[error("platform timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("platform connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Credential rejected by the platform.
    #[error("platform authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded, after retries were exhausted.
    #[error("platform rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry-After hint in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// Platform rejected the request parameters.
    #[error("platform invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Any other non-2xx response.
    #[error("platform HTTP error ({status}): {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Malformed or unexpected payload.
    #[error("platform protocol error: {message}")]
    ProtocolError {
        /// Error message.
        message: String,
    },

    /// Internal adapter error.
    #[error("platform internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

impl PlatformError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(platform: Platform, message: impl Into<String>) -> Self {
        Self::Configuration {
            platform,
            message: message.into(),
        }
    }

    /// Creates the configuration error for an absent API key.
    #[must_use]
    pub fn missing_credential(platform: Platform) -> Self {
        Self::configuration(
            platform,
            format!("{} is not configured", platform.secret_name()),
        )
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: None,
        }
    }

    /// Creates a rate limited error with a retry hint.
    #[must_use]
    pub fn rate_limited_with_retry(message: impl Into<String>, retry_after_ms: u64) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: Some(retry_after_ms),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a generic HTTP status error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::ConfigError,
            _ => ErrorKind::ApiError,
        }
    }

    /// Returns the HTTP status this error was raised for, if known.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_is_config_kind() {
        let error = PlatformError::missing_credential(Platform::Google);
        assert_eq!(error.kind(), ErrorKind::ConfigError);
        assert!(error.to_string().contains("GOOGLE_PLACES_API_KEY"));
    }

    #[test]
    fn call_errors_are_api_kind() {
        assert_eq!(PlatformError::timeout("t").kind(), ErrorKind::ApiError);
        assert_eq!(PlatformError::http(500, "x").kind(), ErrorKind::ApiError);
        assert_eq!(
            PlatformError::protocol_error("bad json").kind(),
            ErrorKind::ApiError
        );
    }

    #[test]
    fn rate_limited_carries_hint() {
        let error = PlatformError::rate_limited_with_retry("slow down", 2000);
        assert!(matches!(
            error,
            PlatformError::RateLimited {
                retry_after_ms: Some(2000),
                ..
            }
        ));
        assert_eq!(error.status(), Some(429));
    }

    #[test]
    fn authentication_has_no_status() {
        let error = PlatformError::authentication("revoked key");
        assert_eq!(error.status(), None);
        assert_eq!(error.kind(), ErrorKind::ApiError);
    }

    #[test]
    fn http_carries_status() {
        let error = PlatformError::http(503, "unavailable");
        assert_eq!(error.status(), Some(503));
        assert!(error.to_string().contains("503"));
    }
}
