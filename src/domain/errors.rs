//! # Domain Errors
//!
//! The error taxonomy shared by every layer.
//!
//! Callers branch on [`ErrorKind`] rather than on messages:
//!
//! ```text
//! CONFIG_ERROR    - credential missing, or no platform available
//! API_ERROR       - a platform call failed or returned a bad payload
//! SEARCH_ERROR    - no platform produced results
//! INVALID_REVIEW  - a review failed schema validation
//! ```
//!
//! # Examples
//!
//! ```
//! use review_import::domain::errors::{DomainError, ErrorKind};
//!
//! let err = DomainError::invalid_review("rating", "must be between 1 and 5, got 6");
//! assert_eq!(err.kind(), ErrorKind::InvalidReview);
//! assert_eq!(err.kind().to_string(), "INVALID_REVIEW");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Named error kinds used uniformly across adapters, the aggregator and the
/// validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Missing credential, or zero platforms available.
    ConfigError,
    /// An outbound platform call failed or returned an unexpected payload.
    ApiError,
    /// Aggregation-level failure: no platform produced results.
    SearchError,
    /// A review failed schema validation.
    InvalidReview,
}

impl ErrorKind {
    /// Returns the canonical upper-case name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::ApiError => "API_ERROR",
            Self::SearchError => "SEARCH_ERROR",
            Self::InvalidReview => "INVALID_REVIEW",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by domain rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A review field violated the review schema.
    #[error("invalid review: {field} {reason}")]
    InvalidReview {
        /// Offending field name.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A rating value was outside 1..=5.
    #[error("invalid rating: {0} (expected 1..=5)")]
    InvalidRating(i64),

    /// An enum value could not be parsed.
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
}

impl DomainError {
    /// Creates an invalid review error.
    #[must_use]
    pub fn invalid_review(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidReview {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the taxonomy kind of this error.
    ///
    /// Every domain rule guards review data, so all variants are
    /// `INVALID_REVIEW`.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidReview
    }

    /// Returns the offending field, if known.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidReview { field, .. } => Some(field),
            Self::InvalidRating(_) => Some("rating"),
            Self::InvalidValue(..) => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
