//! # Testimonial Hand-off
//!
//! The shape an accepted [`Review`] takes when handed to the persistence
//! collaborator.
//!
//! ```text
//! Review.author_name                         -> author_name
//! Review.content                             -> content
//! Review.rating                              -> rating
//! Review.time                                -> created_at
//! Review.platform                            -> source
//! Review.review_url                          -> source_url
//! place_id, profile_url, profile_photo_url   -> source_metadata
//! ```

use crate::domain::entities::review::Review;
use crate::domain::value_objects::{Platform, Rating, TestimonialId, Timestamp};
use serde::{Deserialize, Serialize};

/// Provenance details kept alongside a testimonial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Platform-scoped id of the place the review came from.
    pub place_id: String,
    /// Reviewer profile page.
    pub profile_url: Option<String>,
    /// Reviewer avatar.
    pub profile_photo_url: Option<String>,
}

/// A testimonial ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTestimonial {
    /// Reviewer display name.
    pub author_name: String,
    /// Testimonial body.
    pub content: String,
    /// Star rating.
    pub rating: Rating,
    /// When the original review was written.
    pub created_at: Timestamp,
    /// Originating platform.
    pub source: Platform,
    /// Link to the original review.
    pub source_url: Option<String>,
    /// Provenance details.
    pub source_metadata: SourceMetadata,
}

impl NewTestimonial {
    /// Maps a review from `place_id` into the testimonial shape.
    ///
    /// A `time` that cannot be represented falls back to the Unix epoch.
    #[must_use]
    pub fn from_review(review: Review, place_id: impl Into<String>) -> Self {
        let created_at = Timestamp::from_millis(review.time)
            .or_else(|| Timestamp::from_millis(0))
            .unwrap_or_else(Timestamp::now);

        Self {
            author_name: review.author_name,
            content: review.content,
            rating: review.rating,
            created_at,
            source: review.platform,
            source_url: review.review_url,
            source_metadata: SourceMetadata {
                place_id: place_id.into(),
                profile_url: review.profile_url,
                profile_photo_url: review.profile_photo_url,
            },
        }
    }
}

/// A persisted testimonial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    /// Assigned identifier.
    pub id: TestimonialId,
    /// The stored fields.
    #[serde(flatten)]
    pub fields: NewTestimonial,
    /// When the testimonial was imported.
    pub imported_at: Timestamp,
}

impl Testimonial {
    /// Assigns an id and import time to a new testimonial.
    #[must_use]
    pub fn create(fields: NewTestimonial) -> Self {
        Self {
            id: TestimonialId::new_v4(),
            fields,
            imported_at: Timestamp::now(),
        }
    }
}
