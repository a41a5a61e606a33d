//! Helpers shared by the adapters when mapping platform payloads into
//! [`Review`](crate::domain::entities::Review) and
//! [`SearchResult`](crate::domain::entities::SearchResult).

use crate::domain::entities::{Review, SearchResult};
use crate::domain::services::is_http_url;
use crate::domain::value_objects::{Platform, Rating, Timestamp};
use crate::infrastructure::platforms::error::{PlatformError, PlatformResult};
use futures::future::join_all;
use serde::{Deserialize, Deserializer};
use std::future::Future;
use tracing::{debug, warn};
use url::Url;

/// Returns the trimmed string if it is not blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Returns the trimmed link if it is an absolute http(s) URL. A
/// protocol-relative `//host/path` link is read as https. Anything else
/// is dropped so every mapped review passes validation.
pub(crate) fn link(value: Option<String>) -> Option<String> {
    let value = non_blank(value)?;
    let value = if value.starts_with("//") {
        format!("https:{value}")
    } else {
        value
    };
    if is_http_url(&value) {
        Some(value)
    } else {
        debug!(link = %value, "dropping non-http link");
        None
    }
}

/// Parses a platform date string into epoch milliseconds. Unparsable or
/// missing dates become `0`.
pub(crate) fn time_millis(platform: Platform, value: Option<&str>) -> i64 {
    match value {
        Some(raw) => Timestamp::parse_platform(raw)
            .map(|ts| ts.timestamp_millis())
            .unwrap_or_else(|| {
                debug!(%platform, value = raw, "unparsable review date, using epoch");
                0
            }),
        None => 0,
    }
}

/// Builds a review from raw platform fields. Returns `None` when the
/// author, content or rating is missing.
pub(crate) fn review(
    platform: Platform,
    author_name: Option<String>,
    content: Option<String>,
    rating: Option<f64>,
    time: i64,
) -> Option<Review> {
    let (Some(author_name), Some(content)) = (non_blank(author_name), non_blank(content)) else {
        debug!(%platform, "review without author or text, skipping");
        return None;
    };
    let Some(rating) = rating else {
        debug!(%platform, author = %author_name, "review without rating, skipping");
        return None;
    };
    Some(Review::new(
        author_name,
        content,
        Rating::clamped(rating),
        time,
        platform,
    ))
}

/// Appends path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> PlatformResult<String> {
    let mut url = Url::parse(base)
        .map_err(|e| PlatformError::internal_error(format!("invalid base URL {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| PlatformError::internal_error(format!("base URL {base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

/// Runs the detail phase: fetches up to `max_places` places concurrently
/// and drops any place whose fetch fails.
pub(crate) async fn fetch_places<S, F, Fut>(
    platform: Platform,
    stubs: Vec<S>,
    max_places: usize,
    place_id: fn(&S) -> &str,
    fetch: F,
) -> Vec<SearchResult>
where
    F: Fn(S) -> Fut,
    Fut: Future<Output = PlatformResult<SearchResult>>,
{
    let pending = stubs.into_iter().take(max_places).map(|stub| {
        let id = place_id(&stub).to_string();
        let fut = fetch(stub);
        async move { (id, fut.await) }
    });

    join_all(pending)
        .await
        .into_iter()
        .filter_map(|(id, result)| match result {
            Ok(place) => Some(place),
            Err(e) => {
                warn!(%platform, place_id = %id, error = %e, "place details failed, skipping");
                None
            }
        })
        .collect()
}

/// Accepts a JSON number or a numeric string; anything else is `None`.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}

/// Accepts a JSON string or number as an identifier.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

/// Optional variant of [`string_or_number`].
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Option::<Wrap>::deserialize(deserializer)?.map(|Wrap(s)| s))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct LenientFields {
        #[serde(default, deserialize_with = "lenient_f64")]
        rating: Option<f64>,
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "opt_string_or_number")]
        user_id: Option<String>,
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(Some("  hi ".into())).as_deref(), Some("hi"));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn link_keeps_only_http_urls() {
        assert_eq!(
            link(Some(" https://www.yelp.com/biz/a ".into())).as_deref(),
            Some("https://www.yelp.com/biz/a")
        );
        assert_eq!(
            link(Some("//lh3.googleusercontent.com/a.png".into())).as_deref(),
            Some("https://lh3.googleusercontent.com/a.png")
        );
        assert_eq!(link(Some("/maps/contrib/1".into())), None);
        assert_eq!(link(Some("javascript:alert(1)".into())), None);
        assert_eq!(link(Some("ftp://example.com/x".into())), None);
        assert_eq!(link(None), None);
    }

    #[test]
    fn time_millis_falls_back_to_zero() {
        assert_eq!(time_millis(Platform::Yelp, Some("not a date")), 0);
        assert_eq!(time_millis(Platform::Yelp, None), 0);
        assert_eq!(
            time_millis(Platform::Yelp, Some("2023-06-01 12:00:00")),
            1_685_620_800_000
        );
    }

    #[test]
    fn review_requires_author_text_and_rating() {
        let built = review(
            Platform::Google,
            Some(" Ann ".into()),
            Some("Great".into()),
            Some(4.6),
            10,
        )
        .unwrap();
        assert_eq!(built.author_name, "Ann");
        assert_eq!(built.rating.get(), 5);
        assert_eq!(built.time, 10);

        assert!(review(Platform::Google, Some("Ann".into()), Some("  ".into()), Some(4.0), 0).is_none());
        assert!(review(Platform::Google, None, Some("x".into()), Some(4.0), 0).is_none());
        assert!(review(Platform::Google, Some("Ann".into()), Some("x".into()), None, 0).is_none());
    }

    #[test]
    fn endpoint_encodes_segments() {
        let url = endpoint("https://api.yelp.com/v3", &["businesses", "a b/c", "reviews"]).unwrap();
        assert_eq!(url, "https://api.yelp.com/v3/businesses/a%20b%2Fc/reviews");
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let url = endpoint("http://127.0.0.1:9000/", &["location", "search"]).unwrap();
        assert_eq!(url, "http://127.0.0.1:9000/location/search");
    }

    #[test]
    fn lenient_fields_accept_strings_and_numbers() {
        let a: LenientFields = serde_json::from_str(r#"{"rating":"4.5","id":12,"user_id":"u1"}"#).unwrap();
        assert_eq!(a.rating, Some(4.5));
        assert_eq!(a.id, "12");
        assert_eq!(a.user_id.as_deref(), Some("u1"));

        let b: LenientFields = serde_json::from_str(r#"{"rating":null,"id":"x"}"#).unwrap();
        assert_eq!(b.rating, None);
        assert_eq!(b.user_id, None);

        let c: LenientFields = serde_json::from_str(r#"{"rating":"n/a","id":"x","user_id":7}"#).unwrap();
        assert_eq!(c.rating, None);
        assert_eq!(c.user_id.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn fetch_places_drops_failures_and_caps() {
        let stubs = vec!["a", "b", "c", "d"];
        let places = fetch_places(
            Platform::Google,
            stubs,
            3,
            |s: &&str| *s,
            |s: &str| async move {
                if s == "b" {
                    Err(PlatformError::http(500, "boom"))
                } else {
                    Ok(SearchResult::new(s, s, "", Platform::Google))
                }
            },
        )
        .await;

        let ids: Vec<&str> = places.iter().map(|p| p.place_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_places_runs_details_concurrently() {
        let started = tokio::time::Instant::now();
        let places = fetch_places(
            Platform::Yelp,
            vec!["a", "b", "c", "d", "e"],
            5,
            |s: &&str| *s,
            |s: &str| async move {
                tokio::time::sleep(std::time::Duration::from_secs(10)).await;
                Ok(SearchResult::new(s, s, "", Platform::Yelp))
            },
        )
        .await;

        assert_eq!(places.len(), 5);
        assert!(started.elapsed() < std::time::Duration::from_secs(20));
    }
}
