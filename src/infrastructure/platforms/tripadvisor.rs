//! # TripAdvisor Content API Adapter
//!
//! Searches `location/search` and pulls reviews from
//! `location/{id}/reviews`. The key travels in the
//! `X-TripAdvisor-API-Key` header. Ratings and ids may arrive as strings.

use crate::domain::entities::{Review, SearchResult};
use crate::domain::value_objects::Platform;
use crate::infrastructure::platforms::error::{PlatformError, PlatformResult};
use crate::infrastructure::platforms::http_client::HttpClient;
use crate::infrastructure::platforms::normalize::{
    self, lenient_f64, opt_string_or_number, string_or_number,
};
use crate::infrastructure::platforms::traits::{PlatformAdapter, PlatformConfig, require_api_key};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Production API root.
pub const TRIPADVISOR_BASE_URL: &str = "https://api.content.tripadvisor.com/api/v1";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-tripadvisor-api-key";

const PROFILE_BASE: &str = "https://www.tripadvisor.com/Profile/";

const LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(deserialize_with = "string_or_number")]
    location_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default)]
    web_url: Option<String>,
    #[serde(default)]
    address_obj: Option<AddressObj>,
}

#[derive(Debug, Deserialize)]
struct AddressObj {
    #[serde(default)]
    address_string: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TripAdvisorReview {
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    user: TripAdvisorUser,
}

#[derive(Debug, Default, Deserialize)]
struct TripAdvisorUser {
    #[serde(default)]
    username: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    user_id: Option<String>,
    #[serde(default)]
    avatar: Option<Avatar>,
}

#[derive(Debug, Deserialize)]
struct Avatar {
    #[serde(default)]
    small: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

fn map_review(raw: TripAdvisorReview) -> Option<Review> {
    let time = normalize::time_millis(Platform::TripAdvisor, raw.published_date.as_deref());
    let mut review = normalize::review(
        Platform::TripAdvisor,
        raw.user.username,
        raw.text,
        raw.rating,
        time,
    )?;
    review.profile_url = normalize::non_blank(raw.user.user_id)
        .and_then(|id| normalize::link(Some(format!("{PROFILE_BASE}{id}"))));
    review.profile_photo_url = raw
        .user
        .avatar
        .and_then(|a| normalize::link(a.small).or_else(|| normalize::link(a.thumbnail)));
    review.review_url = normalize::link(raw.url);
    Some(review)
}

fn map_location(location: Location, reviews: Vec<TripAdvisorReview>) -> SearchResult {
    let name = normalize::non_blank(location.name).unwrap_or_default();
    let address = location
        .address_obj
        .and_then(|a| normalize::non_blank(a.address_string))
        .unwrap_or_default();
    let reviews = reviews.into_iter().filter_map(map_review).collect();

    let mut place = SearchResult::new(location.location_id, name, address, Platform::TripAdvisor)
        .with_reviews(reviews);
    place.rating = location.rating;
    place.url = normalize::link(location.web_url);
    place
}

/// TripAdvisor Content API adapter.
pub struct TripAdvisorAdapter {
    config: PlatformConfig,
    http: HttpClient,
}

impl TripAdvisorAdapter {
    /// Creates the adapter. The key is sent in the `x-tripadvisor-api-key`
    /// header.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Platform API key; `None` or blank disables the adapter.
    /// * `config` - Endpoint root, place cap, timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Configuration` if the key is missing, blank,
    /// or not a valid header value.
    pub fn new(api_key: Option<&str>, config: PlatformConfig) -> PlatformResult<Self> {
        let api_key = require_api_key(Platform::TripAdvisor, api_key)?;
        let mut value = HeaderValue::from_str(&api_key).map_err(|_| {
            PlatformError::configuration(
                Platform::TripAdvisor,
                "API key is not a valid header value",
            )
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        let http = HttpClient::with_headers(config.timeout_ms, headers)?;

        Ok(Self { config, http })
    }

    /// Returns the adapter configuration.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    async fn search(&self, query: &str) -> PlatformResult<Vec<Location>> {
        let url = normalize::endpoint(&self.config.base_url, &["location", "search"])?;
        let params = [("searchQuery", query), ("language", LANGUAGE)];
        let body: DataEnvelope<Location> = self
            .http
            .get_json(&url, &params[..], &HeaderMap::new(), &self.config.retry)
            .await?;
        Ok(body.data)
    }

    async fn location_reviews(&self, location: Location) -> PlatformResult<SearchResult> {
        let url = normalize::endpoint(
            &self.config.base_url,
            &["location", &location.location_id, "reviews"],
        )?;
        let params = [("language", LANGUAGE)];
        let body: DataEnvelope<TripAdvisorReview> = self
            .http
            .get_json(&url, &params[..], &HeaderMap::new(), &self.config.retry)
            .await?;
        Ok(map_location(location, body.data))
    }
}

impl fmt::Debug for TripAdvisorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripAdvisorAdapter")
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PlatformAdapter for TripAdvisorAdapter {
    fn platform(&self) -> Platform {
        Platform::TripAdvisor
    }

    async fn search_businesses(&self, query: &str) -> PlatformResult<Vec<SearchResult>> {
        let locations = self.search(query).await?;
        debug!(
            platform = %Platform::TripAdvisor,
            places = locations.len(),
            "location search complete"
        );

        Ok(normalize::fetch_places(
            Platform::TripAdvisor,
            locations,
            self.config.max_places,
            |location: &Location| location.location_id.as_str(),
            |location| self.location_reviews(location),
        )
        .await)
    }
}
