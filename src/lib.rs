//! # review-import
//!
//! Aggregates customer reviews from Google Places, Yelp and TripAdvisor into
//! a single ranked list of candidate testimonials.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ application                                                  │
//! │   ReviewImportService ── fan-out ──┬── GoogleAdapter         │
//! │        │        │                  ├── YelpAdapter           │
//! │        │        └── ResultCache    └── TripAdvisorAdapter    │
//! │        └── RankingStrategy                                   │
//! │   TestimonialImportService ── validate_review ── repository  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`domain`]: review and search-result types, validation, error kinds
//! - [`application`]: aggregation, ranking and the testimonial hand-off
//! - [`infrastructure`]: platform adapters, HTTP/retry, cache, persistence port
//! - [`config`]: service settings and platform credentials
//!
//! # Examples
//!
//! ```ignore
//! use review_import::application::services::ReviewImportService;
//! use review_import::config::{EnvSecretProvider, PlatformCredentials, ServiceConfig};
//!
//! let config = ServiceConfig::from_env()?;
//! let credentials = PlatformCredentials::from_provider(&EnvSecretProvider::load());
//! let service = ReviewImportService::from_credentials(&credentials, &config)?;
//!
//! let results = service.search_businesses("coffee shop").await?;
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
