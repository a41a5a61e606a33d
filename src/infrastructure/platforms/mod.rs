//! # Platform Adapters
//!
//! Outbound integrations with review platforms.
//!
//! ## Available Adapters
//!
//! - [`GooglePlacesAdapter`]: Google Places text search and place details
//! - [`YelpAdapter`]: Yelp Fusion business search and reviews
//! - [`TripAdvisorAdapter`]: TripAdvisor Content API location search and reviews
//!
//! All adapters share [`HttpClient`] and its [`RetryPolicy`] backoff, and
//! return [`PlatformError`] on failure.

pub mod error;
pub mod google;
pub mod http_client;
mod normalize;
pub mod retry;
pub mod traits;
pub mod tripadvisor;
pub mod yelp;

pub use error::{PlatformError, PlatformResult};
pub use google::{GOOGLE_BASE_URL, GooglePlacesAdapter};
pub use http_client::HttpClient;
pub use retry::RetryPolicy;
pub use traits::{PlatformAdapter, PlatformConfig};
pub use tripadvisor::{TRIPADVISOR_BASE_URL, TripAdvisorAdapter};
pub use yelp::{YELP_BASE_URL, YelpAdapter};

use crate::domain::value_objects::Platform;

/// Returns the production API root for `platform`.
#[must_use]
pub fn default_base_url(platform: Platform) -> &'static str {
    match platform {
        Platform::Google => GOOGLE_BASE_URL,
        Platform::Yelp => YELP_BASE_URL,
        Platform::TripAdvisor => TRIPADVISOR_BASE_URL,
    }
}
