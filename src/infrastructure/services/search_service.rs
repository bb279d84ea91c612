//! Place search backed by the geocoding upstream

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::domain::cache::{Cache, CacheExt, CacheKey};
use crate::domain::geo::{GeocodeResult, SearchQuery, SEARCH_NAMESPACE};
use crate::domain::upstream::GeocodeProvider;
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_cache_lookup, record_upstream_request, CacheOutcome};
use crate::infrastructure::throttle::CourtesyThrottle;

/// Lifetime of a cached search result
pub const DEFAULT_SEARCH_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct SearchServiceConfig {
    /// TTL for successful geocode results
    pub ttl: Duration,
    /// Sent as User-Agent to the geocoder
    pub client_id: String,
}

impl SearchServiceConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            ttl: DEFAULT_SEARCH_TTL,
            client_id: client_id.into(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug)]
pub struct SearchService {
    cache: Arc<dyn Cache>,
    provider: Arc<dyn GeocodeProvider>,
    throttle: Arc<CourtesyThrottle>,
    config: SearchServiceConfig,
}

impl SearchService {
    pub fn new(
        cache: Arc<dyn Cache>,
        provider: Arc<dyn GeocodeProvider>,
        throttle: Arc<CourtesyThrottle>,
        config: SearchServiceConfig,
    ) -> Self {
        Self {
            cache,
            provider,
            throttle,
            config,
        }
    }

    /// Resolves a raw query string, from cache when possible
    pub async fn search(&self, raw: &str) -> Result<GeocodeResult, DomainError> {
        let query = SearchQuery::parse(raw)?;

        if let Some(cached) = self.cached(&query).await {
            debug!(query = %query, "Serving search from cache");
            return Ok(cached);
        }

        self.refresh(&query).await
    }

    /// Cached matches for `query`. Read failures are logged and reported as
    /// absent.
    pub async fn cached(&self, query: &SearchQuery) -> Option<GeocodeResult> {
        let key = query.cache_key();

        match self.cache.get::<GeocodeResult>(&key).await {
            Ok(Some(result)) => {
                record_cache_lookup(SEARCH_NAMESPACE, CacheOutcome::Hit);
                Some(result)
            }
            Ok(None) => {
                record_cache_lookup(SEARCH_NAMESPACE, CacheOutcome::Miss);
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Search cache read failed, treating as miss");
                record_cache_lookup(SEARCH_NAMESPACE, CacheOutcome::Error);
                None
            }
        }
    }

    /// Queries the geocoder, honoring the courtesy interval, and caches a
    /// successful answer. Failures are never cached.
    pub async fn refresh(&self, query: &SearchQuery) -> Result<GeocodeResult, DomainError> {
        self.throttle.acquire().await;

        let started = Instant::now();
        let result = self.provider.geocode(query, &self.config.client_id).await;
        record_upstream_request(
            self.provider.provider_name(),
            result.is_ok(),
            started.elapsed(),
        );

        let matches = result?;
        let key = query.cache_key();

        if let Err(e) = self.cache.set(&key, &matches, self.config.ttl).await {
            warn!(key = %key, error = %e, "Failed to cache search result");
        } else {
            info!(query = %query, matches = matches.len(), "Cached search result");
        }

        Ok(matches)
    }
}
