//! # Rating Value Object
//!
//! A single review's star rating, always within `1..=5`.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A star rating in the closed range `1..=5`.
///
/// # Examples
///
/// ```
/// use review_import::domain::value_objects::rating::Rating;
///
/// assert_eq!(Rating::new(4).unwrap().get(), 4);
/// assert!(Rating::new(6).is_err());
///
/// // Platform payloads are clamped rather than rejected.
/// assert_eq!(Rating::clamped(4.6).get(), 5);
/// assert_eq!(Rating::clamped(0.0).get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Lowest allowed rating.
    pub const MIN: u8 = 1;
    /// Highest allowed rating.
    pub const MAX: u8 = 5;

    /// Creates a rating, rejecting values outside `1..=5`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRating` if the value is out of range.
    pub fn new(value: i64) -> DomainResult<Self> {
        match u8::try_from(value) {
            Ok(stars) if (Self::MIN..=Self::MAX).contains(&stars) => Ok(Self(stars)),
            _ => Err(DomainError::InvalidRating(value)),
        }
    }

    /// Creates a rating from a platform-provided number, rounding to the
    /// nearest star and clamping into `1..=5`. Non-finite input maps to 1.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if !value.is_finite() {
            return Self(Self::MIN);
        }
        let rounded = value.round().clamp(f64::from(Self::MIN), f64::from(Self::MAX));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let stars = rounded as u8;
        Self(stars)
    }

    /// Returns the numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Rating::new(1).unwrap().get(), 1);
        assert_eq!(Rating::new(5).unwrap().get(), 5);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(Rating::new(0), Err(DomainError::InvalidRating(0)));
        assert_eq!(Rating::new(6), Err(DomainError::InvalidRating(6)));
        assert!(Rating::new(-3).is_err());
    }

    #[test]
    fn clamped_rounds_and_bounds() {
        assert_eq!(Rating::clamped(3.4).get(), 3);
        assert_eq!(Rating::clamped(3.5).get(), 4);
        assert_eq!(Rating::clamped(10.0).get(), 5);
        assert_eq!(Rating::clamped(-1.0).get(), 1);
        assert_eq!(Rating::clamped(f64::NAN).get(), 1);
    }

    #[test]
    fn deserialize_validates() {
        let ok: Rating = serde_json::from_str("3").unwrap();
        assert_eq!(ok.get(), 3);
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Rating::new(4).unwrap().to_string(), "4/5");
    }
}
