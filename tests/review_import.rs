//! End-to-end search and import against mocked Google, Yelp and
//! TripAdvisor APIs.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use review_import::application::ApplicationError;
use review_import::application::services::{ReviewImportService, TestimonialImportService};
use review_import::config::{PlatformCredentials, RetrySettings, ServiceConfig, StaticSecretProvider};
use review_import::domain::errors::ErrorKind;
use review_import::domain::value_objects::Platform;
use review_import::infrastructure::persistence::InMemoryTestimonialRepository;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Platforms {
    google: MockServer,
    yelp: MockServer,
    tripadvisor: MockServer,
}

impl Platforms {
    async fn start() -> Self {
        Self {
            google: MockServer::start().await,
            yelp: MockServer::start().await,
            tripadvisor: MockServer::start().await,
        }
    }

    fn config(&self) -> ServiceConfig {
        ServiceConfig {
            retry: RetrySettings {
                max_retries: 1,
                base_delay_ms: 5,
            },
            google_base_url: Some(self.google.uri()),
            yelp_base_url: Some(self.yelp.uri()),
            tripadvisor_base_url: Some(self.tripadvisor.uri()),
            ..ServiceConfig::default()
        }
    }
}

fn all_keys() -> PlatformCredentials {
    let provider: StaticSecretProvider = [
        ("GOOGLE_PLACES_API_KEY", "g-key"),
        ("YELP_API_KEY", "y-key"),
        ("TRIPADVISOR_API_KEY", "ta-key"),
    ]
    .into_iter()
    .collect();
    PlatformCredentials::from_provider(&provider)
}

async fn mount_google(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("query", "Coffee Shop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{"place_id": "g1", "name": "Bean There"}, {"place_id": "g2"}]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "g1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {
                "name": "Bean There",
                "rating": 4.4,
                "formatted_address": "1 Main St",
                "reviews": [
                    {"author_name": "Ana", "rating": 5, "text": "Great espresso", "time": 1_700_000_000},
                    {"author_name": "Ben", "rating": 4, "text": "Nice patio", "time": 1_700_000_100}
                ]
            }
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "g2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {"name": "Quiet Corner", "rating": 4.9, "formatted_address": "5 Oak Ave"}
        })))
        .mount(server)
        .await;
}

async fn mount_tripadvisor(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/location/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"location_id": "77", "name": "Harbor Coffee", "rating": "4.8"}]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/location/77/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "rating": 5,
                "text": "Lovely view",
                "published_date": "2024-02-10T09:30:00Z",
                "user": {"username": "traveler42"}
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_yelp_outage(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn partial_failure_still_returns_ranked_results() {
    let platforms = Platforms::start().await;
    mount_google(&platforms.google, 1).await;
    mount_tripadvisor(&platforms.tripadvisor).await;
    mount_yelp_outage(&platforms.yelp).await;

    let service = ReviewImportService::from_credentials(&all_keys(), &platforms.config()).unwrap();
    assert_eq!(
        service.active_platforms(),
        vec![Platform::Google, Platform::Yelp, Platform::TripAdvisor]
    );

    let report = service.search_with_report("Coffee Shop").await.unwrap();

    assert!(!report.from_cache);
    assert!(report.is_partial());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].platform, Platform::Yelp);
    assert_eq!(report.failures[0].kind, ErrorKind::ApiError);
    assert_eq!(report.filtered_empty, 1);

    let ids: Vec<&str> = report.results.iter().map(|r| r.place_id.as_str()).collect();
    assert_eq!(ids, vec!["77", "g1"]);
    assert_eq!(report.best().unwrap().platform, Platform::TripAdvisor);
    assert_eq!(report.results[1].reviews.len(), 2);
}

#[tokio::test]
async fn repeated_query_is_served_from_cache() {
    let platforms = Platforms::start().await;
    mount_google(&platforms.google, 1).await;
    mount_tripadvisor(&platforms.tripadvisor).await;
    mount_yelp_outage(&platforms.yelp).await;

    let service = ReviewImportService::from_credentials(&all_keys(), &platforms.config()).unwrap();
    let first = service.search_businesses("Coffee Shop").await.unwrap();

    // Lower-cased query shares the cache entry; the Google mock expects one call.
    let report = service.search_with_report("coffee shop").await.unwrap();
    assert!(report.from_cache);
    assert!(report.platforms_queried.is_empty());
    assert_eq!(report.results, first);
}

#[tokio::test]
async fn every_platform_failing_is_search_error() {
    let platforms = Platforms::start().await;
    for server in [&platforms.google, &platforms.yelp, &platforms.tripadvisor] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(server)
            .await;
    }

    let service = ReviewImportService::from_credentials(&all_keys(), &platforms.config()).unwrap();
    let err = service.search_businesses("anything").await.unwrap_err();

    assert!(matches!(err, ApplicationError::AllPlatformsFailed(ref m) if m.len() == 3));
    assert_eq!(err.kind(), ErrorKind::SearchError);
    assert!(service.cache().is_empty());
}

#[tokio::test]
async fn failure_report_never_contains_keys() {
    let platforms = Platforms::start().await;
    for server in [&platforms.google, &platforms.yelp, &platforms.tripadvisor] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(server)
            .await;
    }

    let service = ReviewImportService::from_credentials(&all_keys(), &platforms.config()).unwrap();
    let err = service.search_businesses("Coffee Shop").await.unwrap_err();

    let message = err.to_string();
    for key in ["g-key", "y-key", "ta-key"] {
        assert!(!message.contains(key), "{message}");
    }
}

#[tokio::test]
async fn only_keyed_platforms_are_called() {
    let platforms = Platforms::start().await;
    mount_tripadvisor(&platforms.tripadvisor).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&platforms.google)
        .await;

    let credentials = PlatformCredentials {
        tripadvisor_key: Some("ta-key".into()),
        ..PlatformCredentials::default()
    };
    let service = ReviewImportService::from_credentials(&credentials, &platforms.config()).unwrap();
    assert_eq!(service.active_platforms(), vec![Platform::TripAdvisor]);

    let results = service.search_businesses("harbor").await.unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn no_credentials_is_config_error() {
    let err = ReviewImportService::from_credentials(
        &PlatformCredentials::default(),
        &ServiceConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigError);
}

#[tokio::test]
async fn chosen_review_is_imported_as_testimonial() {
    let platforms = Platforms::start().await;
    mount_google(&platforms.google, 1).await;
    mount_tripadvisor(&platforms.tripadvisor).await;
    mount_yelp_outage(&platforms.yelp).await;

    let service = ReviewImportService::from_credentials(&all_keys(), &platforms.config()).unwrap();
    let results = service.search_businesses("Coffee Shop").await.unwrap();

    let repository = InMemoryTestimonialRepository::new();
    let importer = TestimonialImportService::new(Arc::new(repository.clone()));
    let testimonial = importer.import_from_result(&results[1], 1).await.unwrap();

    assert_eq!(testimonial.fields.author_name, "Ben");
    assert_eq!(testimonial.fields.source, Platform::Google);
    assert_eq!(testimonial.fields.source_metadata.place_id, "g1");
    assert_eq!(repository.len(), 1);
}
