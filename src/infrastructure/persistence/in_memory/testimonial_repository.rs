//! # In-Memory Testimonial Repository
//!
//! In-memory implementation of [`TestimonialRepository`] for testing and
//! for the demo binary.
//!
//! This implementation uses a thread-safe `HashMap` for storage.

use crate::domain::entities::{NewTestimonial, Testimonial};
use crate::domain::value_objects::{Platform, TestimonialId};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, TestimonialRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Identity of a review on its platform: who wrote it, where, and when.
type SourceKey = (Platform, String, String, i64);

fn source_key(fields: &NewTestimonial) -> SourceKey {
    (
        fields.source,
        fields.source_metadata.place_id.clone(),
        fields.author_name.clone(),
        fields.created_at.timestamp_millis(),
    )
}

#[derive(Debug, Default)]
struct Storage {
    by_id: HashMap<TestimonialId, Testimonial>,
    by_source: HashMap<SourceKey, TestimonialId>,
}

/// In-memory implementation of [`TestimonialRepository`].
///
/// Importing the same review (platform, place, author and time) twice
/// fails with [`RepositoryError::Duplicate`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTestimonialRepository {
    storage: Arc<RwLock<Storage>>,
}

impl InMemoryTestimonialRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored testimonials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.by_id.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every testimonial.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.by_id.clear();
        storage.by_source.clear();
    }
}

#[async_trait]
impl TestimonialRepository for InMemoryTestimonialRepository {
    async fn create(&self, testimonial: NewTestimonial) -> RepositoryResult<Testimonial> {
        let key = source_key(&testimonial);
        let mut storage = self.storage.write().await;
        if let Some(existing) = storage.by_source.get(&key) {
            return Err(RepositoryError::duplicate("Testimonial", existing.to_string()));
        }

        let stored = Testimonial::create(testimonial);
        storage.by_source.insert(key, stored.id);
        storage.by_id.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: &TestimonialId) -> RepositoryResult<Option<Testimonial>> {
        let storage = self.storage.read().await;
        Ok(storage.by_id.get(id).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<Testimonial>> {
        let storage = self.storage.read().await;
        let mut all: Vec<Testimonial> = storage.by_id.values().cloned().collect();
        all.sort_by(|a, b| {
            a.imported_at
                .as_datetime()
                .cmp(b.imported_at.as_datetime())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(all)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::Review;
    use crate::domain::value_objects::Rating;

    fn new_testimonial(author: &str, time: i64) -> NewTestimonial {
        let review = Review::new(
            author,
            "Lovely service",
            Rating::new(5).unwrap(),
            time,
            Platform::Google,
        );
        NewTestimonial::from_review(review, "place-1")
    }

    #[tokio::test]
    async fn create_and_get() {
        let repo = InMemoryTestimonialRepository::new();
        let stored = repo.create(new_testimonial("Ann", 1_000)).await.unwrap();

        let fetched = repo.get(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let repo = InMemoryTestimonialRepository::new();
        let missing = repo.get(&TestimonialId::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn duplicate_review_is_rejected() {
        let repo = InMemoryTestimonialRepository::new();
        repo.create(new_testimonial("Ann", 1_000)).await.unwrap();

        let err = repo.create(new_testimonial("Ann", 1_000)).await.unwrap_err();
        assert!(err.is_duplicate());

        repo.create(new_testimonial("Ann", 2_000)).await.unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn list_and_clear() {
        let repo = InMemoryTestimonialRepository::new();
        repo.create(new_testimonial("Ann", 1)).await.unwrap();
        repo.create(new_testimonial("Bob", 2)).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
        repo.clear().await;
        assert!(repo.is_empty());
    }
}
