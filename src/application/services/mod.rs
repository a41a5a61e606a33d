//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`ReviewImportService`]: concurrent cross-platform search, ranking and caching
//! - [`RankingStrategy`]: strategies for ordering search results
//! - [`TestimonialImportService`]: validation and hand-off of chosen reviews

pub mod ranking_strategy;
pub mod review_import;
pub mod testimonial_import;

pub use ranking_strategy::{RankingStrategy, RatingThenReviewCount};
pub use review_import::{
    AggregationConfig, PlatformFailure, ReviewImportService, SearchReport, cache_key,
};
pub use testimonial_import::TestimonialImportService;
