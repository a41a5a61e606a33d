//! # Domain Enums
//!
//! - [`Platform`] - The third-party review platforms the system can query
//!
//! Enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A third-party review platform.
///
/// # Examples
///
/// ```
/// use review_import::domain::value_objects::enums::Platform;
///
/// let platform: Platform = "TripAdvisor".parse().unwrap();
/// assert_eq!(platform, Platform::TripAdvisor);
/// assert_eq!(platform.to_string(), "tripadvisor");
/// assert_eq!(platform.display_name(), "TripAdvisor");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Platform {
    /// Google Places.
    Google = 0,
    /// Yelp Fusion.
    Yelp = 1,
    /// TripAdvisor Content API.
    TripAdvisor = 2,
}

impl Platform {
    /// All platforms in declaration order.
    pub const ALL: [Self; 3] = [Self::Google, Self::Yelp, Self::TripAdvisor];

    /// Returns the lowercase wire name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Yelp => "yelp",
            Self::TripAdvisor => "tripadvisor",
        }
    }

    /// Returns the human-facing brand name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Yelp => "Yelp",
            Self::TripAdvisor => "TripAdvisor",
        }
    }

    /// Returns the name of the secret holding this platform's API key.
    #[must_use]
    pub const fn secret_name(self) -> &'static str {
        match self {
            Self::Google => "GOOGLE_PLACES_API_KEY",
            Self::Yelp => "YELP_API_KEY",
            Self::TripAdvisor => "TRIPADVISOR_API_KEY",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "yelp" => Ok(Self::Yelp),
            "tripadvisor" => Ok(Self::TripAdvisor),
            _ => Err(DomainError::InvalidValue("platform", s.to_string())),
        }
    }
}
