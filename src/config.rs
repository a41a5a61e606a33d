//! # Configuration
//!
//! Service settings and platform credentials.
//!
//! [`ServiceConfig`] is read from `REVIEW_IMPORT__*` environment variables
//! (a `.env` file is loaded first), with `__` separating nested keys:
//!
//! ```text
//! REVIEW_IMPORT__CACHE__TTL_SECS=120
//! REVIEW_IMPORT__AGGREGATION__TIMEOUT_MS=20000
//! REVIEW_IMPORT__YELP_LOCATION="San Francisco, CA"
//! ```
//!
//! API keys are not part of `ServiceConfig`. They come from a
//! [`SecretProvider`] and are collected into [`PlatformCredentials`].

use crate::application::services::review_import::AggregationConfig;
use crate::domain::value_objects::Platform;
use crate::infrastructure::platforms::{PlatformConfig, RetryPolicy, default_base_url};
use crate::infrastructure::platforms::retry::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_RETRIES};
use crate::infrastructure::platforms::traits::{DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_MAX_PLACES};
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Prefix of every configuration environment variable.
pub const ENV_PREFIX: &str = "REVIEW_IMPORT";

/// Separator between nested keys in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

/// Result cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
    /// Seconds between background sweeps.
    pub cleanup_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            cleanup_interval_secs: 60,
        }
    }
}

/// Backoff settings applied to every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Result cache.
    pub cache: CacheSettings,
    /// Fan-out timeouts.
    pub aggregation: AggregationConfig,
    /// Rate-limit backoff.
    pub retry: RetrySettings,
    /// HTTP client.
    pub http: HttpSettings,
    /// Places fetched per platform.
    pub max_places: usize,
    /// Overrides the Google Places API root.
    pub google_base_url: Option<String>,
    /// Overrides the Yelp API root.
    pub yelp_base_url: Option<String>,
    /// Overrides the TripAdvisor API root.
    pub tripadvisor_base_url: Option<String>,
    /// Fixed Yelp search location. When unset the query is used.
    pub yelp_location: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache: CacheSettings::default(),
            aggregation: AggregationConfig::default(),
            retry: RetrySettings::default(),
            http: HttpSettings::default(),
            max_places: DEFAULT_MAX_PLACES,
            google_base_url: None,
            yelp_base_url: None,
            tripadvisor_base_url: None,
            yelp_location: None,
        }
    }
}

impl ServiceConfig {
    /// Loads `.env` if present, then reads `REVIEW_IMPORT__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed into its field.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_environment(Environment::default())
    }

    /// Reads configuration from an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed into its field, or if
    /// the result fails [`validate`](Self::validate).
    pub fn from_environment(source: Environment) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(
                source
                    .prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the first zero-valued interval
    /// or timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("cache.cleanup_interval_secs", self.cache.cleanup_interval_secs),
            ("http.timeout_ms", self.http.timeout_ms),
            ("aggregation.timeout_ms", self.aggregation.timeout_ms),
            (
                "aggregation.per_platform_timeout_ms",
                self.aggregation.per_platform_timeout_ms,
            ),
        ];
        match required.iter().find(|(_, value)| *value == 0) {
            Some((key, _)) => Err(ConfigError::Message(format!("{key} must be greater than zero"))),
            None => Ok(()),
        }
    }

    /// Returns the cache TTL.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Returns the interval between cache sweeps.
    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache.cleanup_interval_secs)
    }

    /// Returns the retry policy shared by all adapters.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry.max_retries, self.retry.base_delay_ms)
    }

    /// Builds the adapter configuration for `platform`.
    #[must_use]
    pub fn platform_config(&self, platform: Platform) -> PlatformConfig {
        let base_url = match platform {
            Platform::Google => self.google_base_url.as_deref(),
            Platform::Yelp => self.yelp_base_url.as_deref(),
            Platform::TripAdvisor => self.tripadvisor_base_url.as_deref(),
        }
        .unwrap_or_else(|| default_base_url(platform));

        PlatformConfig::new(base_url)
            .with_max_places(self.max_places)
            .with_timeout(self.http.timeout_ms)
            .with_retry(self.retry_policy())
    }
}

/// Source of API keys.
pub trait SecretProvider: Send + Sync {
    /// Returns the secret named `name`, if set.
    fn get_secret(&self, name: &str) -> Option<String>;
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    /// Loads `.env` if present and returns the provider.
    #[must_use]
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self
    }
}

impl SecretProvider for EnvSecretProvider {
    fn get_secret(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Map-backed secrets, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    secrets: HashMap<String, String>,
}

impl StaticSecretProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a secret.
    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for StaticSecretProvider
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            secrets: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SecretProvider for StaticSecretProvider {
    fn get_secret(&self, name: &str) -> Option<String> {
        self.secrets.get(name).cloned()
    }
}

/// API keys for each platform. Blank keys are treated as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PlatformCredentials {
    /// Google Places key.
    pub google_key: Option<String>,
    /// Yelp Fusion key.
    pub yelp_key: Option<String>,
    /// TripAdvisor Content API key.
    pub tripadvisor_key: Option<String>,
}

impl PlatformCredentials {
    /// Reads every platform's key from `provider`.
    #[must_use]
    pub fn from_provider(provider: &dyn SecretProvider) -> Self {
        let read = |platform: Platform| {
            provider
                .get_secret(platform.secret_name())
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
        };
        Self {
            google_key: read(Platform::Google),
            yelp_key: read(Platform::Yelp),
            tripadvisor_key: read(Platform::TripAdvisor),
        }
    }

    /// Returns the key for `platform`.
    #[must_use]
    pub fn key(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Google => self.google_key.as_deref(),
            Platform::Yelp => self.yelp_key.as_deref(),
            Platform::TripAdvisor => self.tripadvisor_key.as_deref(),
        }
    }

    /// Platforms that have a key, in declaration order.
    #[must_use]
    pub fn available_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.key(*p).is_some_and(|k| !k.trim().is_empty()))
            .collect()
    }
}

impl fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("PlatformCredentials")
            .field("google_key", &mask(&self.google_key))
            .field("yelp_key", &mask(&self.yelp_key))
            .field("tripadvisor_key", &mask(&self.tripadvisor_key))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn defaults_without_variables() {
        let config = ServiceConfig::from_environment(env(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.cleanup_interval(), Duration::from_secs(60));
        assert_eq!(config.aggregation.timeout_ms, 45_000);
        assert_eq!(config.aggregation.per_platform_timeout_ms, 30_000);
        assert_eq!(config.max_places, 5);
    }

    #[test]
    fn zero_cleanup_interval_is_rejected() {
        let err = ServiceConfig::from_environment(env(&[(
            "REVIEW_IMPORT__CACHE__CLEANUP_INTERVAL_SECS",
            "0",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("cache.cleanup_interval_secs"));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let mut config = ServiceConfig::default();
        config.http.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.aggregation.per_platform_timeout_ms = 0;
        assert!(config.validate().is_err());

        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn nested_overrides() {
        let config = ServiceConfig::from_environment(env(&[
            ("REVIEW_IMPORT__CACHE__TTL_SECS", "120"),
            ("REVIEW_IMPORT__RETRY__MAX_RETRIES", "1"),
            ("REVIEW_IMPORT__MAX_PLACES", "2"),
            ("REVIEW_IMPORT__YELP_BASE_URL", "http://127.0.0.1:9000"),
            ("REVIEW_IMPORT__YELP_LOCATION", "Austin, TX"),
            ("UNRELATED", "x"),
        ]))
        .unwrap();

        assert_eq!(config.cache.ttl_secs, 120);
        assert_eq!(config.cache.cleanup_interval_secs, 60);
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.max_places, 2);
        assert_eq!(config.yelp_location.as_deref(), Some("Austin, TX"));

        let yelp = config.platform_config(Platform::Yelp);
        assert_eq!(yelp.base_url, "http://127.0.0.1:9000");
        assert_eq!(yelp.max_places, 2);
        assert_eq!(yelp.retry.max_retries, 1);

        let google = config.platform_config(Platform::Google);
        assert_eq!(google.base_url, default_base_url(Platform::Google));
    }

    #[test]
    fn unparsable_value_is_an_error() {
        let result =
            ServiceConfig::from_environment(env(&[("REVIEW_IMPORT__MAX_PLACES", "many")]));
        assert!(result.is_err());
    }

    #[test]
    fn credentials_ignore_blank_keys() {
        let provider: StaticSecretProvider = [
            ("GOOGLE_PLACES_API_KEY", "g-key"),
            ("YELP_API_KEY", "   "),
        ]
        .into_iter()
        .collect();

        let creds = PlatformCredentials::from_provider(&provider);
        assert_eq!(creds.google_key.as_deref(), Some("g-key"));
        assert_eq!(creds.yelp_key, None);
        assert_eq!(creds.tripadvisor_key, None);
        assert_eq!(creds.available_platforms(), vec![Platform::Google]);
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let provider = StaticSecretProvider::new().with_secret("TRIPADVISOR_API_KEY", "ta-123");
        let creds = PlatformCredentials::from_provider(&provider);
        let debug = format!("{creds:?}");
        assert!(!debug.contains("ta-123"));
        assert!(debug.contains("redacted"));
    }
}
