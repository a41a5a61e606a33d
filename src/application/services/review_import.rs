//! # Review Import Service
//!
//! Fans a search out to every configured review platform, merges the
//! results, ranks them and caches the ranked list.
//!
//! A failing or slow platform never fails the search on its own: its
//! error is logged and recorded in the [`SearchReport`], and the other
//! platforms' results are returned. The search fails only when no
//! platform succeeded or the overall deadline elapsed.
//!
//! The fan-out polls every adapter future together inside the caller's
//! task, so dropping the returned future cancels all in-flight requests
//! and nothing is cached.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::ranking_strategy::{RankingStrategy, RatingThenReviewCount};
use crate::config::{PlatformCredentials, ServiceConfig};
use crate::domain::entities::SearchResult;
use crate::domain::errors::ErrorKind;
use crate::domain::value_objects::Platform;
use crate::infrastructure::cache::ResultCache;
use crate::infrastructure::platforms::{
    GooglePlacesAdapter, PlatformAdapter, PlatformError, PlatformResult, TripAdvisorAdapter,
    YelpAdapter,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Cache key prefix for search results.
const CACHE_KEY_PREFIX: &str = "search:";

/// Timeouts applied to a search fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Overall deadline for one search in milliseconds.
    pub timeout_ms: u64,
    /// Deadline for each platform in milliseconds.
    pub per_platform_timeout_ms: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 45_000,
            per_platform_timeout_ms: 30_000,
        }
    }
}

impl AggregationConfig {
    /// Creates a configuration with the specified overall timeout.
    #[must_use]
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Default::default()
        }
    }

    /// Sets the per-platform timeout.
    #[must_use]
    pub fn with_per_platform_timeout(mut self, timeout_ms: u64) -> Self {
        self.per_platform_timeout_ms = timeout_ms;
        self
    }
}

/// A platform that contributed nothing to a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformFailure {
    /// The failing platform.
    pub platform: Platform,
    /// Error kind.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
}

/// Outcome of a search with per-platform detail.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// Ranked results, best first.
    pub results: Vec<SearchResult>,
    /// Platforms that were called. Empty on a cache hit.
    pub platforms_queried: Vec<Platform>,
    /// Platforms that failed or timed out.
    pub failures: Vec<PlatformFailure>,
    /// True if `results` came from the cache.
    pub from_cache: bool,
    /// Results dropped because they had no reviews.
    pub filtered_empty: usize,
}

impl SearchReport {
    /// Returns the best result, if any.
    #[must_use]
    pub fn best(&self) -> Option<&SearchResult> {
        self.results.first()
    }

    /// Returns true if at least one platform failed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Returns the cache key for `query`.
#[must_use]
pub fn cache_key(query: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{}", query.to_lowercase())
}

/// Aggregates reviews across platforms.
#[derive(Debug)]
pub struct ReviewImportService {
    adapters: Vec<Arc<dyn PlatformAdapter>>,
    ranking_strategy: Arc<dyn RankingStrategy>,
    cache: Arc<ResultCache<Vec<SearchResult>>>,
    config: AggregationConfig,
}

impl ReviewImportService {
    /// Creates a service over the given adapters.
    ///
    /// # Arguments
    ///
    /// * `adapters` - Platforms to query, in call and tie-break order.
    /// * `ranking_strategy` - Orders the merged results.
    /// * `cache` - Stores ranked results per query.
    /// * `config` - Overall and per-platform deadlines.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if `adapters` is empty.
    pub fn new(
        adapters: Vec<Arc<dyn PlatformAdapter>>,
        ranking_strategy: Arc<dyn RankingStrategy>,
        cache: Arc<ResultCache<Vec<SearchResult>>>,
        config: AggregationConfig,
    ) -> ApplicationResult<Self> {
        if adapters.is_empty() {
            return Err(ApplicationError::configuration(
                "no review platforms configured",
            ));
        }
        Ok(Self {
            adapters,
            ranking_strategy,
            cache,
            config,
        })
    }

    /// Builds an adapter for every platform that has a key.
    ///
    /// Platforms without a key are skipped. A key the adapter rejects at
    /// construction is logged and that platform is skipped too.
    ///
    /// # Arguments
    ///
    /// * `credentials` - API keys per platform.
    /// * `config` - Endpoints, limits, cache TTL and deadlines.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if no adapter was built.
    pub fn from_credentials(
        credentials: &PlatformCredentials,
        config: &ServiceConfig,
    ) -> ApplicationResult<Self> {
        let mut adapters: Vec<Arc<dyn PlatformAdapter>> = Vec::new();

        for platform in Platform::ALL {
            let Some(key) = credentials.key(platform) else {
                info!(
                    %platform,
                    secret = platform.secret_name(),
                    "API key not configured, platform disabled"
                );
                continue;
            };

            match build_adapter(platform, key, config) {
                Ok(adapter) => {
                    info!(%platform, "platform adapter enabled");
                    adapters.push(adapter);
                }
                Err(e) => warn!(%platform, error = %e, "platform adapter rejected, skipping"),
            }
        }

        Self::new(
            adapters,
            Arc::new(RatingThenReviewCount::new()),
            Arc::new(ResultCache::new(config.cache_ttl())),
            config.aggregation.clone(),
        )
    }

    /// Searches every platform and returns ranked results with reviews.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::InvalidQuery` - blank query
    /// - `ApplicationError::AllPlatformsFailed` - no platform succeeded
    /// - `ApplicationError::Timeout` - the overall deadline elapsed
    pub async fn search_businesses(&self, query: &str) -> ApplicationResult<Vec<SearchResult>> {
        Ok(self.search_with_report(query).await?.results)
    }

    /// Like [`search_businesses`](Self::search_businesses), and also
    /// reports which platforms were queried and which failed.
    ///
    /// # Errors
    ///
    /// See [`search_businesses`](Self::search_businesses).
    pub async fn search_with_report(&self, query: &str) -> ApplicationResult<SearchReport> {
        if query.trim().is_empty() {
            return Err(ApplicationError::invalid_query("query must not be blank"));
        }

        let key = cache_key(query);
        if let Some(results) = self.cache.get(&key) {
            debug!(key = %key, results = results.len(), "search cache hit");
            return Ok(SearchReport {
                results,
                platforms_queried: Vec::new(),
                failures: Vec::new(),
                from_cache: true,
                filtered_empty: 0,
            });
        }

        let overall = Duration::from_millis(self.config.timeout_ms);
        let outcomes = timeout(overall, self.collect_from_platforms(query))
            .await
            .map_err(|_| {
                warn!(query, timeout_ms = self.config.timeout_ms, "search timed out");
                ApplicationError::Timeout(self.config.timeout_ms)
            })?;

        let platforms_queried: Vec<Platform> = outcomes.iter().map(|(p, _)| *p).collect();
        let mut collected = Vec::new();
        let mut failures = Vec::new();
        let mut succeeded = 0usize;

        for (platform, outcome) in outcomes {
            match outcome {
                Ok(results) => {
                    succeeded += 1;
                    collected.extend(results);
                }
                Err(e) => {
                    warn!(%platform, kind = %e.kind(), error = %e, "platform search failed");
                    failures.push(PlatformFailure {
                        platform,
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if succeeded == 0 {
            return Err(ApplicationError::all_platforms_failed(
                failures.iter().map(|f| (f.platform, f.message.as_str())),
            ));
        }

        let total = collected.len();
        let with_reviews: Vec<SearchResult> =
            collected.into_iter().filter(SearchResult::has_reviews).collect();
        let filtered_empty = total - with_reviews.len();

        let results = self.ranking_strategy.rank(with_reviews);
        self.cache.set(key, results.clone());

        debug!(
            query,
            results = results.len(),
            filtered_empty,
            failed = failures.len(),
            "search aggregated"
        );

        Ok(SearchReport {
            results,
            platforms_queried,
            failures,
            from_cache: false,
            filtered_empty,
        })
    }

    /// Calls every adapter concurrently, each under its own deadline.
    async fn collect_from_platforms(
        &self,
        query: &str,
    ) -> Vec<(Platform, PlatformResult<Vec<SearchResult>>)> {
        let per_platform_ms = self.config.per_platform_timeout_ms;
        let per_platform = Duration::from_millis(per_platform_ms);

        let calls = self.adapters.iter().map(|adapter| async move {
            let platform = adapter.platform();
            let outcome = match timeout(per_platform, adapter.search_businesses(query)).await {
                Ok(result) => result,
                Err(_) => Err(PlatformError::timeout_with_duration(
                    "platform search timed out",
                    per_platform_ms,
                )),
            };
            (platform, outcome)
        });

        join_all(calls).await
    }

    /// Removes the cached results for `query`. Returns true if present.
    pub fn invalidate(&self, query: &str) -> bool {
        self.cache.delete(&cache_key(query))
    }

    /// Starts the background cache sweep. Must be called from within a
    /// Tokio runtime.
    pub fn start_cache_cleanup(&self, every: Duration) -> JoinHandle<()> {
        self.cache.spawn_cleanup(every)
    }

    /// Platforms with a configured adapter, in call order.
    #[must_use]
    pub fn active_platforms(&self) -> Vec<Platform> {
        self.adapters.iter().map(|a| a.platform()).collect()
    }

    /// Returns the result cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<ResultCache<Vec<SearchResult>>> {
        &self.cache
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Returns the ranking strategy name.
    #[must_use]
    pub fn ranking_strategy_name(&self) -> &'static str {
        self.ranking_strategy.name()
    }
}

fn build_adapter(
    platform: Platform,
    key: &str,
    config: &ServiceConfig,
) -> PlatformResult<Arc<dyn PlatformAdapter>> {
    let platform_config = config.platform_config(platform);
    Ok(match platform {
        Platform::Google => Arc::new(GooglePlacesAdapter::new(Some(key), platform_config)?),
        Platform::Yelp => Arc::new(
            YelpAdapter::new(Some(key), platform_config)?
                .with_location(config.yelp_location.clone()),
        ),
        Platform::TripAdvisor => Arc::new(TripAdvisorAdapter::new(Some(key), platform_config)?),
    })
}
