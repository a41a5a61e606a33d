//! # Review Entity
//!
//! The normalized, platform-agnostic review shape every adapter maps into.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Platform, Rating};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single customer review, normalized across platforms.
///
/// `time` is Unix epoch **milliseconds** for every platform.
///
/// # Examples
///
/// ```
/// use review_import::domain::entities::Review;
/// use review_import::domain::value_objects::{Platform, Rating};
///
/// let review = Review::new("Ada", "Great espresso", Rating::new(5).unwrap(), 1_700_000_000_000, Platform::Google)
///     .with_review_url("https://example.com/r/1");
/// assert!(review.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer display name. Non-empty.
    pub author_name: String,
    /// Review body. Non-empty.
    pub content: String,
    /// Star rating, 1..=5.
    pub rating: Rating,
    /// Unix epoch milliseconds.
    pub time: i64,
    /// Originating platform.
    pub platform: Platform,
    /// Reviewer profile page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    /// Reviewer avatar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    /// Link to the review itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_url: Option<String>,
}

impl Review {
    /// Creates a review with no optional links.
    #[must_use]
    pub fn new(
        author_name: impl Into<String>,
        content: impl Into<String>,
        rating: Rating,
        time: i64,
        platform: Platform,
    ) -> Self {
        Self {
            author_name: author_name.into(),
            content: content.into(),
            rating,
            time,
            platform,
            profile_url: None,
            profile_photo_url: None,
            review_url: None,
        }
    }

    /// Sets the reviewer profile URL.
    #[must_use]
    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = Some(url.into());
        self
    }

    /// Sets the reviewer avatar URL.
    #[must_use]
    pub fn with_profile_photo_url(mut self, url: impl Into<String>) -> Self {
        self.profile_photo_url = Some(url.into());
        self
    }

    /// Sets the review URL.
    #[must_use]
    pub fn with_review_url(mut self, url: impl Into<String>) -> Self {
        self.review_url = Some(url.into());
        self
    }

    /// Re-checks the string invariants of an already-typed review.
    ///
    /// The rating invariant is guaranteed by [`Rating`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReview` if `author_name` or `content`
    /// is blank.
    pub fn validate(&self) -> DomainResult<()> {
        if self.author_name.trim().is_empty() {
            return Err(DomainError::invalid_review("author_name", "must not be empty"));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::invalid_review("content", "must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Review({} {} by {})",
            self.platform, self.rating, self.author_name
        )
    }
}
