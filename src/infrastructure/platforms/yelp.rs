//! # Yelp Fusion Adapter
//!
//! Searches `businesses/search` and fetches up to three reviews per
//! business from `businesses/{id}/reviews`. Authenticates with a bearer
//! token sent as a default header.

use crate::domain::entities::{Review, SearchResult};
use crate::domain::value_objects::Platform;
use crate::infrastructure::platforms::error::{PlatformError, PlatformResult};
use crate::infrastructure::platforms::http_client::HttpClient;
use crate::infrastructure::platforms::normalize::{self, lenient_f64};
use crate::infrastructure::platforms::traits::{PlatformAdapter, PlatformConfig, require_api_key};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Production API root.
pub const YELP_BASE_URL: &str = "https://api.yelp.com/v3";

#[derive(Debug, Deserialize)]
struct BusinessSearchResponse {
    #[serde(default)]
    businesses: Vec<Business>,
}

#[derive(Debug, Deserialize)]
struct Business {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    location: Option<BusinessLocation>,
}

#[derive(Debug, Default, Deserialize)]
struct BusinessLocation {
    #[serde(default)]
    display_address: Vec<String>,
    #[serde(default)]
    address1: Option<String>,
}

impl BusinessLocation {
    fn formatted(self) -> String {
        let joined = self
            .display_address
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if joined.is_empty() {
            normalize::non_blank(self.address1).unwrap_or_default()
        } else {
            joined
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    #[serde(default)]
    reviews: Vec<YelpReview>,
}

#[derive(Debug, Deserialize)]
struct YelpReview {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default)]
    time_created: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    user: YelpUser,
}

#[derive(Debug, Default, Deserialize)]
struct YelpUser {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    profile_url: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

fn map_review(raw: YelpReview) -> Option<Review> {
    let time = normalize::time_millis(Platform::Yelp, raw.time_created.as_deref());
    let mut review = normalize::review(Platform::Yelp, raw.user.name, raw.text, raw.rating, time)?;
    review.profile_url = normalize::link(raw.user.profile_url);
    review.profile_photo_url = normalize::link(raw.user.image_url);
    review.review_url = normalize::link(raw.url);
    Some(review)
}

fn map_business(business: Business, reviews: Vec<YelpReview>) -> SearchResult {
    let address = business.location.unwrap_or_default().formatted();
    let name = normalize::non_blank(business.name).unwrap_or_default();
    let reviews = reviews.into_iter().filter_map(map_review).collect();

    let mut place =
        SearchResult::new(business.id, name, address, Platform::Yelp).with_reviews(reviews);
    place.rating = business.rating;
    place.url = normalize::link(business.url);
    place
}

/// Yelp Fusion adapter.
pub struct YelpAdapter {
    config: PlatformConfig,
    location: Option<String>,
    http: HttpClient,
}

impl YelpAdapter {
    /// Creates the adapter. The key is sent as `Authorization: Bearer`.
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
        let api_key = require_api_key(Platform::Yelp, api_key)?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            PlatformError::configuration(Platform::Yelp, "API key is not a valid header value")
        })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        let http = HttpClient::with_headers(config.timeout_ms, headers)?;

        Ok(Self {
            config,
            location: None,
            http,
        })
    }

    /// Fixes the search location. Without one, the query doubles as the
    /// location.
    #[must_use]
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = normalize::non_blank(location);
        self
    }

    /// Returns the adapter configuration.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    async fn search(&self, query: &str) -> PlatformResult<Vec<Business>> {
        let url = normalize::endpoint(&self.config.base_url, &["businesses", "search"])?;
        let location = self.location.as_deref().unwrap_or(query);
        let limit = self.config.max_places.to_string();
        let params = [("term", query), ("location", location), ("limit", limit.as_str())];
        let body: BusinessSearchResponse = self
            .http
            .get_json(&url, &params[..], &HeaderMap::new(), &self.config.retry)
            .await?;
        Ok(body.businesses)
    }

    async fn business_reviews(&self, business: Business) -> PlatformResult<SearchResult> {
        let url = normalize::endpoint(
            &self.config.base_url,
            &["businesses", &business.id, "reviews"],
        )?;
        let body: ReviewsResponse = self
            .http
            .fetch_with_retry(&self.config.retry, |client| client.get(&url))
            .await?;
        Ok(map_business(business, body.reviews))
    }
}

impl fmt::Debug for YelpAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YelpAdapter")
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PlatformAdapter for YelpAdapter {
    fn platform(&self) -> Platform {
        Platform::Yelp
    }

    async fn search_businesses(&self, query: &str) -> PlatformResult<Vec<SearchResult>> {
        let businesses = self.search(query).await?;
        debug!(platform = %Platform::Yelp, places = businesses.len(), "business search complete");

        Ok(normalize::fetch_places(
            Platform::Yelp,
            businesses,
            self.config.max_places,
            |business: &Business| business.id.as_str(),
            |business| self.business_reviews(business),
        )
        .await)
    }
}
