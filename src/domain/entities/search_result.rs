//! # Search Result Entity
//!
//! One place found on one platform, with its normalized reviews.

use crate::domain::entities::review::Review;
use crate::domain::value_objects::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A place/business/location found on a single platform.
///
/// Results from different platforms are never merged, even when they
/// describe the same physical business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Platform-scoped opaque identifier.
    pub place_id: String,
    /// Display name.
    pub name: String,
    /// Formatted address. Empty if the platform did not provide one.
    pub address: String,
    /// The platform's own aggregate rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Originating platform.
    pub platform: Platform,
    /// Normalized reviews, in platform order.
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Canonical page for the place on its platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SearchResult {
    /// Creates a result with no reviews.
    #[must_use]
    pub fn new(
        place_id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            address: address.into(),
            rating: None,
            platform,
            reviews: Vec::new(),
            url: None,
        }
    }

    /// Sets the aggregate rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the reviews.
    #[must_use]
    pub fn with_reviews(mut self, reviews: Vec<Review>) -> Self {
        self.reviews = reviews;
        self
    }

    /// Sets the canonical URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns the number of attached reviews.
    #[inline]
    #[must_use]
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// Returns true if at least one review is attached.
    #[inline]
    #[must_use]
    pub fn has_reviews(&self) -> bool {
        !self.reviews.is_empty()
    }

    /// Returns the aggregate rating used for ranking. Absent or non-finite
    /// ratings rank lowest.
    #[must_use]
    pub fn ranking_rating(&self) -> f64 {
        match self.rating {
            Some(r) if r.is_finite() => r,
            _ => 0.0,
        }
    }

    /// Finds a review by position.
    #[must_use]
    pub fn review(&self, index: usize) -> Option<&Review> {
        self.reviews.get(index)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SearchResult({} {} ", self.platform, self.name)?;
        match self.rating {
            Some(r) => write!(f, "{r:.1}")?,
            None => write!(f, "-")?,
        }
        write!(f, ", {} reviews)", self.reviews.len())
    }
}
