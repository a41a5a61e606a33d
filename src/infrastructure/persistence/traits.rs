//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! Imported reviews are handed to a [`TestimonialRepository`]. The crate
//! ships an in-memory implementation; a database-backed one plugs in
//! behind the same trait.
//!
//! # Examples
//!
//! ```ignore
//! use review_import::infrastructure::persistence::traits::TestimonialRepository;
//!
//! async fn store(repo: &impl TestimonialRepository, fields: NewTestimonial) {
//!     let saved = repo.create(fields).await?;
//!     println!("Stored testimonial {}", saved.id);
//! }
//! ```

use crate::domain::entities::{NewTestimonial, Testimonial};
use crate::domain::value_objects::TestimonialId;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },
}

impl RepositoryError {
    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for imported testimonials.
#[async_trait]
pub trait TestimonialRepository: Send + Sync + fmt::Debug {
    /// Persists a new testimonial and returns it with its assigned id and
    /// import time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the same review from the
    /// same place was already imported.
    async fn create(&self, testimonial: NewTestimonial) -> RepositoryResult<Testimonial>;

    /// Gets a testimonial by id.
    ///
    /// Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn get(&self, id: &TestimonialId) -> RepositoryResult<Option<Testimonial>>;

    /// Returns all testimonials, oldest import first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn list(&self) -> RepositoryResult<Vec<Testimonial>>;
}
