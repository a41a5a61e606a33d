//! Input validation for reviews.
//!
//! Turns an externally-shaped JSON object into a typed [`Review`] before it
//! may become a testimonial candidate. Pure: no I/O, no side effects.
//!
//! # Rules
//!
//! | Field | Constraint |
//! |-------|------------|
//! | `author_name` | Required string, not blank |
//! | `content` | Required string, not blank |
//! | `rating` | Integer 1–5; integral floats and numeric strings are coerced |
//! | `time` | Epoch ms as integer or numeric string, or an RFC 3339 string |
//! | `platform` | `google`, `yelp` or `tripadvisor` (case-insensitive) |
//! | `profile_url`, `profile_photo_url`, `review_url` | Absent, `null`, or an absolute http(s) URL |
//!
//! Unknown fields are ignored. The first violation is returned; nothing is
//! silently coerced into range.

use crate::domain::entities::Review;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Platform, Rating, Timestamp};
use serde_json::{Map, Value};
use url::Url;

/// Validates a raw review object and returns the typed [`Review`].
///
/// # Errors
///
/// Returns `DomainError::InvalidReview` naming the first offending field.
///
/// # Examples
///
/// ```
/// use review_import::domain::services::validate_review;
/// use serde_json::json;
///
/// let review = validate_review(&json!({
///     "author_name": "Ada",
///     "content": "Great coffee",
///     "rating": "5",
///     "time": 1_700_000_000_000_i64,
///     "platform": "google"
/// }))
/// .unwrap();
/// assert_eq!(review.rating.get(), 5);
///
/// assert!(validate_review(&json!({ "author_name": "Ada", "content": "", "rating": 5, "time": 0, "platform": "yelp" })).is_err());
/// ```
pub fn validate_review(raw: &Value) -> DomainResult<Review> {
    let obj = raw
        .as_object()
        .ok_or_else(|| DomainError::invalid_review("review", "must be an object"))?;

    let author_name = required_string(obj, "author_name")?;
    let content = required_string(obj, "content")?;
    let rating = rating_field(obj)?;
    let time = time_field(obj)?;
    let platform = platform_field(obj)?;

    Ok(Review {
        author_name,
        content,
        rating,
        time,
        platform,
        profile_url: optional_url(obj, "profile_url")?,
        profile_photo_url: optional_url(obj, "profile_photo_url")?,
        review_url: optional_url(obj, "review_url")?,
    })
}

fn required_string(obj: &Map<String, Value>, field: &'static str) -> DomainResult<String> {
    match obj.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(DomainError::invalid_review(field, "must not be empty")),
        None | Some(Value::Null) => Err(DomainError::invalid_review(field, "is required")),
        Some(other) => Err(DomainError::invalid_review(
            field,
            format!("must be a string, got {}", type_name(other)),
        )),
    }
}

fn rating_field(obj: &Map<String, Value>) -> DomainResult<Rating> {
    let value = match obj.get("rating") {
        None | Some(Value::Null) => {
            return Err(DomainError::invalid_review("rating", "is required"));
        }
        Some(v) => integral(v)
            .ok_or_else(|| DomainError::invalid_review("rating", "must be a whole number"))?,
    };

    Rating::new(value).map_err(|_| {
        DomainError::invalid_review("rating", format!("must be between 1 and 5, got {value}"))
    })
}

fn time_field(obj: &Map<String, Value>) -> DomainResult<i64> {
    match obj.get("time") {
        None | Some(Value::Null) => Err(DomainError::invalid_review("time", "is required")),
        Some(v) => integral(v)
            .or_else(|| {
                v.as_str()
                    .and_then(Timestamp::parse_platform)
                    .map(|ts| ts.timestamp_millis())
            })
            .ok_or_else(|| {
                DomainError::invalid_review("time", "must be epoch milliseconds or an ISO date")
            }),
    }
}

fn platform_field(obj: &Map<String, Value>) -> DomainResult<Platform> {
    match obj.get("platform") {
        Some(Value::String(s)) => s.parse().map_err(|_| {
            DomainError::invalid_review("platform", format!("unknown platform '{s}'"))
        }),
        None | Some(Value::Null) => Err(DomainError::invalid_review("platform", "is required")),
        Some(other) => Err(DomainError::invalid_review(
            "platform",
            format!("must be a string, got {}", type_name(other)),
        )),
    }
}

/// Returns true if `value` parses as an absolute `http` or `https` URL,
/// the only link form a review may carry.
#[must_use]
pub fn is_http_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn optional_url(obj: &Map<String, Value>, field: &'static str) -> DomainResult<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if is_http_url(s) => Ok(Some(s.clone())),
        Some(Value::String(_)) => Err(DomainError::invalid_review(
            field,
            "must be an absolute http(s) URL",
        )),
        Some(other) => Err(DomainError::invalid_review(
            field,
            format!("must be a string, got {}", type_name(other)),
        )),
    }
}

/// Coerces a JSON number or numeric string into an integer. Fractional
/// values are rejected.
fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

fn whole(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        #[allow(clippy::cast_possible_truncation)]
        let n = f as i64;
        Some(n)
    } else {
        None
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use serde_json::json;

    fn well_formed() -> Value {
        json!({
            "author_name": "Ada Lovelace",
            "content": "The flat white is perfect.",
            "rating": 5,
            "time": 1_685_620_800_000_i64,
            "platform": "tripadvisor",
            "profile_url": "https://www.tripadvisor.com/Profile/abc",
            "profile_photo_url": null,
            "review_url": "https://www.tripadvisor.com/ShowUserReviews-1"
        })
    }

    fn field_of(raw: Value) -> &'static str {
        validate_review(&raw)
            .expect_err("should be rejected")
            .field()
            .unwrap_or("?")
    }

    #[test]
    fn round_trip_matches_field_for_field() {
        let review = Review::new(
            "Grace",
            "Fast and friendly",
            Rating::new(4).unwrap(),
            1_700_000_000_000,
            Platform::Google,
        )
        .with_profile_url("https://maps.google.com/contrib/1")
        .with_profile_photo_url("https://lh3.googleusercontent.com/a.png")
        .with_review_url("https://search.google.com/local/reviews?placeid=x");

        let raw = serde_json::to_value(&review).unwrap();
        assert_eq!(validate_review(&raw).unwrap(), review);
    }

    #[test]
    fn accepts_well_formed_object() {
        let review = validate_review(&well_formed()).unwrap();
        assert_eq!(review.platform, Platform::TripAdvisor);
        assert_eq!(review.rating.get(), 5);
        assert!(review.profile_photo_url.is_none());
    }

    #[test]
    fn rejects_rating_zero_and_six() {
        for bad in [0, 6] {
            let mut raw = well_formed();
            raw["rating"] = json!(bad);
            let err = validate_review(&raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidReview);
            assert_eq!(err.field(), Some("rating"));
        }
    }

    #[test]
    fn rejects_empty_content() {
        let mut raw = well_formed();
        raw["content"] = json!("");
        assert_eq!(field_of(raw), "content");
    }

    #[test]
    fn rejects_missing_author() {
        let mut raw = well_formed();
        raw.as_object_mut().unwrap().remove("author_name");
        assert_eq!(field_of(raw), "author_name");
    }

    #[test]
    fn coerces_numeric_strings() {
        let mut raw = well_formed();
        raw["rating"] = json!(" 3 ");
        raw["time"] = json!("1685620800000");
        let review = validate_review(&raw).unwrap();
        assert_eq!(review.rating.get(), 3);
        assert_eq!(review.time, 1_685_620_800_000);
    }

    #[test]
    fn coerces_integral_float_rating() {
        let mut raw = well_formed();
        raw["rating"] = json!(4.0);
        assert_eq!(validate_review(&raw).unwrap().rating.get(), 4);
    }

    #[test]
    fn rejects_fractional_rating() {
        let mut raw = well_formed();
        raw["rating"] = json!(4.5);
        assert_eq!(field_of(raw), "rating");
    }

    #[test]
    fn accepts_iso_time() {
        let mut raw = well_formed();
        raw["time"] = json!("2023-06-01T12:00:00Z");
        assert_eq!(validate_review(&raw).unwrap().time, 1_685_620_800_000);
    }

    #[test]
    fn rejects_unknown_platform() {
        let mut raw = well_formed();
        raw["platform"] = json!("facebook");
        assert_eq!(field_of(raw), "platform");
    }

    #[test]
    fn rejects_relative_url() {
        let mut raw = well_formed();
        raw["review_url"] = json!("/reviews/1");
        assert_eq!(field_of(raw), "review_url");
    }

    #[test]
    fn rejects_non_object() {
        assert_eq!(field_of(json!([1, 2, 3])), "review");
    }

    #[test]
    fn ignores_unknown_fields() {
        let mut raw = well_formed();
        raw["likes"] = json!(12);
        assert!(validate_review(&raw).is_ok());
    }
}
