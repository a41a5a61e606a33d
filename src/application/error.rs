//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)          - INVALID_REVIEW
//! ├── Platform(PlatformError)      - CONFIG_ERROR / API_ERROR
//! ├── Repository(RepositoryError)  - API_ERROR
//! ├── Configuration(String)        - CONFIG_ERROR
//! ├── InvalidQuery(String)         - SEARCH_ERROR
//! ├── AllPlatformsFailed(..)       - SEARCH_ERROR
//! └── Timeout(u64)                 - SEARCH_ERROR
//! ```
//!
//! # Examples
//!
//! ```
//! use review_import::application::error::ApplicationError;
//! use review_import::domain::errors::ErrorKind;
//!
//! let err = ApplicationError::configuration("no review platforms configured");
//! assert_eq!(err.kind(), ErrorKind::ConfigError);
//! ```

use crate::domain::errors::{DomainError, ErrorKind};
use crate::domain::value_objects::Platform;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::platforms::PlatformError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A review failed validation.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A single platform call failed.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    /// The testimonial store failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The service cannot run with the given configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The search query was rejected before any call was made.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Every platform queried failed.
    #[error("all review platforms failed: {}", .0.join("; "))]
    AllPlatformsFailed(Vec<String>),

    /// The aggregation deadline elapsed.
    #[error("search timed out after {0} ms")]
    Timeout(u64),
}

impl ApplicationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an invalid query error.
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Creates the total-failure error from `(platform, message)` pairs.
    #[must_use]
    pub fn all_platforms_failed<'a>(
        failures: impl IntoIterator<Item = (Platform, &'a str)>,
    ) -> Self {
        Self::AllPlatformsFailed(
            failures
                .into_iter()
                .map(|(platform, message)| format!("{platform}: {message}"))
                .collect(),
        )
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => e.kind(),
            Self::Platform(e) => e.kind(),
            Self::Repository(_) => ErrorKind::ApiError,
            Self::Configuration(_) => ErrorKind::ConfigError,
            Self::InvalidQuery(_) | Self::AllPlatformsFailed(_) | Self::Timeout(_) => {
                ErrorKind::SearchError
            }
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            ApplicationError::from(DomainError::invalid_review("content", "empty")).kind(),
            ErrorKind::InvalidReview
        );
        assert_eq!(
            ApplicationError::from(PlatformError::missing_credential(Platform::Yelp)).kind(),
            ErrorKind::ConfigError
        );
        assert_eq!(
            ApplicationError::from(PlatformError::http(500, "x")).kind(),
            ErrorKind::ApiError
        );
        assert_eq!(ApplicationError::Timeout(10).kind(), ErrorKind::SearchError);
        assert_eq!(
            ApplicationError::invalid_query("blank").kind(),
            ErrorKind::SearchError
        );
    }

    #[test]
    fn all_failed_lists_platforms() {
        let err = ApplicationError::all_platforms_failed([
            (Platform::Google, "rate limited"),
            (Platform::Yelp, "timeout"),
        ]);
        assert_eq!(err.kind(), ErrorKind::SearchError);
        let message = err.to_string();
        assert!(message.contains("google: rate limited"));
        assert!(message.contains("yelp: timeout"));
    }
}
