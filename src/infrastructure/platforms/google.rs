//! # Google Places Adapter
//!
//! Searches Google Places by text and pulls reviews from place details.
//!
//! Google reports failures both as HTTP statuses and as a body-level
//! `status` string. A 200 response carrying `OVER_QUERY_LIMIT` is treated
//! exactly like a 429 that exhausted its retries.

use crate::domain::entities::{Review, SearchResult};
use crate::domain::value_objects::Platform;
use crate::infrastructure::platforms::error::{PlatformError, PlatformResult};
use crate::infrastructure::platforms::http_client::HttpClient;
use crate::infrastructure::platforms::normalize::{self, lenient_f64};
use crate::infrastructure::platforms::traits::{PlatformAdapter, PlatformConfig, require_api_key};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Production API root.
pub const GOOGLE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Public reviews page for a place.
const REVIEWS_PAGE: &str = "https://search.google.com/local/reviews?placeid=";

/// Fields requested from the details endpoint.
const DETAIL_FIELDS: &str = "name,rating,formatted_address,reviews,url";

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceStub>,
}

#[derive(Debug, Deserialize)]
struct PlaceStub {
    place_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<PlaceDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceDetails {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    reviews: Vec<GoogleReview>,
}

#[derive(Debug, Deserialize)]
struct GoogleReview {
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    author_url: Option<String>,
    #[serde(default)]
    profile_photo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default)]
    text: Option<String>,
    /// Seconds since the epoch.
    #[serde(default)]
    time: Option<i64>,
}

/// Outcome of a body-level status check.
#[derive(Debug, PartialEq, Eq)]
enum BodyStatus {
    Ok,
    Empty,
}

fn check_status(status: &str, error_message: Option<&str>) -> PlatformResult<BodyStatus> {
    let detail = error_message.unwrap_or(status);
    match status {
        "OK" => Ok(BodyStatus::Ok),
        "ZERO_RESULTS" => Ok(BodyStatus::Empty),
        "OVER_QUERY_LIMIT" => Err(PlatformError::rate_limited(detail)),
        "REQUEST_DENIED" => Err(PlatformError::authentication(detail)),
        "INVALID_REQUEST" => Err(PlatformError::invalid_request(detail)),
        other => Err(PlatformError::protocol_error(format!(
            "unexpected status {other}: {detail}"
        ))),
    }
}

fn map_review(place_id: &str, raw: GoogleReview) -> Option<Review> {
    let time = raw.time.map_or(0, |secs| secs.saturating_mul(1000));
    let mut review = normalize::review(
        Platform::Google,
        raw.author_name,
        raw.text,
        raw.rating,
        time,
    )?
    .with_review_url(format!("{REVIEWS_PAGE}{place_id}"));
    review.profile_url = normalize::link(raw.author_url);
    review.profile_photo_url = normalize::link(raw.profile_photo_url);
    Some(review)
}

fn map_place(stub: PlaceStub, details: PlaceDetails) -> SearchResult {
    let name = normalize::non_blank(details.name)
        .or_else(|| normalize::non_blank(stub.name))
        .unwrap_or_default();
    let address = normalize::non_blank(details.formatted_address)
        .or_else(|| normalize::non_blank(stub.formatted_address))
        .unwrap_or_default();
    let reviews = details
        .reviews
        .into_iter()
        .filter_map(|r| map_review(&stub.place_id, r))
        .collect();

    let mut place = SearchResult::new(stub.place_id, name, address, Platform::Google)
        .with_reviews(reviews);
    place.rating = details.rating.or(stub.rating);
    place.url = normalize::link(details.url);
    place
}

/// Google Places adapter.
pub struct GooglePlacesAdapter {
    api_key: String,
    config: PlatformConfig,
    http: HttpClient,
}

impl GooglePlacesAdapter {
    /// Creates the adapter. The key is sent as the `key` query parameter.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Platform API key; `None` or blank disables the adapter.
    /// * `config` - Endpoint root, place cap, timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Configuration` if the key is missing or blank.
    pub fn new(api_key: Option<&str>, config: PlatformConfig) -> PlatformResult<Self> {
        let api_key = require_api_key(Platform::Google, api_key)?;
        let http = HttpClient::new(config.timeout_ms)?;
        Ok(Self {
            api_key,
            config,
            http,
        })
    }

    /// Returns the adapter configuration.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    async fn text_search(&self, query: &str) -> PlatformResult<Vec<PlaceStub>> {
        let url = normalize::endpoint(&self.config.base_url, &["textsearch", "json"])?;
        let params = [("query", query), ("key", self.api_key.as_str())];
        let body: TextSearchResponse = self
            .http
            .get_json(&url, &params[..], &HeaderMap::new(), &self.config.retry)
            .await?;

        match check_status(&body.status, body.error_message.as_deref())? {
            BodyStatus::Ok => Ok(body.results),
            BodyStatus::Empty => Ok(Vec::new()),
        }
    }

    async fn place_details(&self, stub: PlaceStub) -> PlatformResult<SearchResult> {
        let url = normalize::endpoint(&self.config.base_url, &["details", "json"])?;
        let params = [
            ("place_id", stub.place_id.as_str()),
            ("fields", DETAIL_FIELDS),
            ("key", self.api_key.as_str()),
        ];
        let body: DetailsResponse = self
            .http
            .get_json(&url, &params[..], &HeaderMap::new(), &self.config.retry)
            .await?;

        let details = match check_status(&body.status, body.error_message.as_deref())? {
            BodyStatus::Ok => body.result.unwrap_or_default(),
            BodyStatus::Empty => PlaceDetails::default(),
        };
        Ok(map_place(stub, details))
    }
}

impl fmt::Debug for GooglePlacesAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GooglePlacesAdapter")
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PlatformAdapter for GooglePlacesAdapter {
    fn platform(&self) -> Platform {
        Platform::Google
    }

    async fn search_businesses(&self, query: &str) -> PlatformResult<Vec<SearchResult>> {
        let stubs = self.text_search(query).await?;
        debug!(platform = %Platform::Google, places = stubs.len(), "text search complete");

        Ok(normalize::fetch_places(
            Platform::Google,
            stubs,
            self.config.max_places,
            |stub: &PlaceStub| stub.place_id.as_str(),
            |stub| self.place_details(stub),
        )
        .await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    #[test]
    fn missing_key_is_config_error() {
        let err = GooglePlacesAdapter::new(None, PlatformConfig::new(GOOGLE_BASE_URL)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigError);
    }

    #[test]
    fn debug_redacts_key() {
        let adapter =
            GooglePlacesAdapter::new(Some("secret-key"), PlatformConfig::new(GOOGLE_BASE_URL))
                .unwrap();
        assert!(!format!("{adapter:?}").contains("secret-key"));
    }

    #[test]
    fn body_status_mapping() {
        assert_eq!(check_status("OK", None).unwrap(), BodyStatus::Ok);
        assert_eq!(check_status("ZERO_RESULTS", None).unwrap(), BodyStatus::Empty);
        assert!(matches!(
            check_status("OVER_QUERY_LIMIT", None),
            Err(PlatformError::RateLimited { .. })
        ));
        assert!(matches!(
            check_status("REQUEST_DENIED", Some("bad key")),
            Err(PlatformError::Authentication { .. })
        ));
        assert!(matches!(
            check_status("UNKNOWN_ERROR", None),
            Err(PlatformError::ProtocolError { .. })
        ));
    }

    #[test]
    fn maps_review_fields() {
        let raw: GoogleReview = serde_json::from_value(serde_json::json!({
            "author_name": "Jane",
            "author_url": "https://www.google.com/maps/contrib/1",
            "profile_photo_url": "https://lh3.googleusercontent.com/a.png",
            "rating": 5,
            "text": "Lovely espresso",
            "time": 1_700_000_000
        }))
        .unwrap();

        let review = map_review("abc", raw).unwrap();
        assert_eq!(review.author_name, "Jane");
        assert_eq!(review.content, "Lovely espresso");
        assert_eq!(review.rating.get(), 5);
        assert_eq!(review.time, 1_700_000_000_000);
        assert_eq!(review.platform, Platform::Google);
        assert_eq!(
            review.review_url.as_deref(),
            Some("https://search.google.com/local/reviews?placeid=abc")
        );
        assert_eq!(
            review.profile_url.as_deref(),
            Some("https://www.google.com/maps/contrib/1")
        );
    }

    #[test]
    fn mapped_review_links_pass_validation() {
        let raw: GoogleReview = serde_json::from_value(serde_json::json!({
            "author_name": "Jane",
            "author_url": "/maps/contrib/1",
            "profile_photo_url": "//lh3.googleusercontent.com/a-/photo.png",
            "rating": 4,
            "text": "Good pastries",
            "time": 1_700_000_000
        }))
        .unwrap();

        let review = map_review("abc", raw).unwrap();
        assert_eq!(review.profile_url, None);
        assert_eq!(
            review.profile_photo_url.as_deref(),
            Some("https://lh3.googleusercontent.com/a-/photo.png")
        );

        let reimported =
            crate::domain::services::validate_review(&serde_json::to_value(&review).unwrap())
                .unwrap();
        assert_eq!(reimported, review);
    }

    #[test]
    fn skips_reviews_without_text() {
        let raw: GoogleReview =
            serde_json::from_value(serde_json::json!({"author_name": "Jane", "rating": 4, "text": ""}))
                .unwrap();
        assert!(map_review("abc", raw).is_none());
    }

    #[test]
    fn place_falls_back_to_stub_fields() {
        let stub = PlaceStub {
            place_id: "p1".into(),
            name: Some("Blue Bottle".into()),
            formatted_address: Some("1 Main St".into()),
            rating: Some(4.4),
        };
        let place = map_place(stub, PlaceDetails::default());
        assert_eq!(place.name, "Blue Bottle");
        assert_eq!(place.address, "1 Main St");
        assert_eq!(place.rating, Some(4.4));
        assert!(!place.has_reviews());
    }
}
