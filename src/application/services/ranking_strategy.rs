//! # Ranking Strategy
//!
//! Strategies for ordering aggregated search results.
//!
//! This module provides the [`RankingStrategy`] trait and the default
//! [`RatingThenReviewCount`] implementation.

use crate::domain::entities::SearchResult;
use std::cmp::Ordering;
use std::fmt;

/// Trait for ranking strategies.
///
/// Implementations must be deterministic: the same input in the same
/// order always yields the same output.
pub trait RankingStrategy: Send + Sync + fmt::Debug {
    /// Returns `results` sorted best first.
    fn rank(&self, results: Vec<SearchResult>) -> Vec<SearchResult>;

    /// Returns the name of this ranking strategy.
    fn name(&self) -> &'static str;
}

/// Rating descending, then review count descending.
///
/// A missing or non-finite rating counts as `0.0`. The sort is stable, so
/// full ties keep their input order (platform order, then the order each
/// platform returned).
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingThenReviewCount;

impl RatingThenReviewCount {
    /// Creates the strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Orders `a` before `b` when `a` ranks higher.
    #[must_use]
    pub fn compare(a: &SearchResult, b: &SearchResult) -> Ordering {
        b.ranking_rating()
            .total_cmp(&a.ranking_rating())
            .then_with(|| b.review_count().cmp(&a.review_count()))
    }
}

impl RankingStrategy for RatingThenReviewCount {
    fn rank(&self, mut results: Vec<SearchResult>) -> Vec<SearchResult> {
        results.sort_by(Self::compare);
        results
    }

    fn name(&self) -> &'static str {
        "RatingThenReviewCount"
    }
}
