//! # Testimonial Import Service
//!
//! Validates reviews chosen by a user and hands them to the testimonial
//! repository.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{NewTestimonial, SearchResult, Testimonial};
use crate::domain::errors::DomainError;
use crate::domain::services::validate_review;
use crate::infrastructure::persistence::TestimonialRepository;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Imports reviews as testimonials.
#[derive(Debug, Clone)]
pub struct TestimonialImportService {
    repository: Arc<dyn TestimonialRepository>,
}

impl TestimonialImportService {
    /// Creates the service over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn TestimonialRepository>) -> Self {
        Self { repository }
    }

    /// Validates one raw review from `place_id` and stores it.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the review is invalid, or
    /// `ApplicationError::Repository` if it cannot be stored.
    pub async fn import_review(
        &self,
        raw: &Value,
        place_id: &str,
    ) -> ApplicationResult<Testimonial> {
        let review = validate_review(raw)?;
        let stored = self
            .repository
            .create(NewTestimonial::from_review(review, place_id))
            .await?;
        info!(
            testimonial_id = %stored.id,
            source = %stored.fields.source,
            place_id,
            "review imported"
        );
        Ok(stored)
    }

    /// Validates every raw review first, then stores them in order.
    ///
    /// Nothing is stored if any review is invalid.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, or the first repository error.
    /// Reviews stored before a repository error stay stored.
    pub async fn import_reviews(
        &self,
        raws: &[Value],
        place_id: &str,
    ) -> ApplicationResult<Vec<Testimonial>> {
        let reviews = raws
            .iter()
            .map(validate_review)
            .collect::<Result<Vec<_>, _>>()?;

        let mut stored = Vec::with_capacity(reviews.len());
        for review in reviews {
            stored.push(
                self.repository
                    .create(NewTestimonial::from_review(review, place_id))
                    .await?,
            );
        }
        info!(count = stored.len(), place_id, "reviews imported");
        Ok(stored)
    }

    /// Imports review `review_index` of an aggregated search result.
    ///
    /// The review goes through the same validation as a raw payload.
    ///
    /// # Arguments
    ///
    /// * `result` - A place returned by the search.
    /// * `review_index` - Position of the review within `result.reviews`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the index is out of range or
    /// the review is invalid, or `ApplicationError::Repository` if it
    /// cannot be stored.
    pub async fn import_from_result(
        &self,
        result: &SearchResult,
        review_index: usize,
    ) -> ApplicationResult<Testimonial> {
        let review = result.review(review_index).ok_or_else(|| {
            DomainError::invalid_review(
                "review_index",
                format!(
                    "{} has {} reviews, index {} is out of range",
                    result.place_id,
                    result.review_count(),
                    review_index
                ),
            )
        })?;
        let raw = serde_json::to_value(review)
            .map_err(|e| DomainError::invalid_review("review", e.to_string()))
            .map_err(ApplicationError::from)?;
        self.import_review(&raw, &result.place_id).await
    }
}
