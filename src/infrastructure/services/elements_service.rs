//! Drinking water lookups with per-cell caching

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::domain::cache::{Cache, CacheExt, CacheKey};
use crate::domain::geo::{BoundingBox, ElementsResult, GeoCell, OVERPASS_NAMESPACE};
use crate::domain::upstream::ElementsProvider;
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_cache_lookup, record_upstream_request, CacheOutcome};

/// Lifetime of a warmed cell
pub const DEFAULT_CELL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct ElementsServiceConfig {
    pub cell_ttl: Duration,
}

impl Default for ElementsServiceConfig {
    fn default() -> Self {
        Self {
            cell_ttl: DEFAULT_CELL_TTL,
        }
    }
}

impl ElementsServiceConfig {
    pub fn with_cell_ttl(mut self, ttl: Duration) -> Self {
        self.cell_ttl = ttl;
        self
    }
}

/// Answers bounding box queries, from the cell cache when the box's cell is
/// warm and from the upstream otherwise.
///
/// On a miss the whole cell is fetched in a detached task so that later
/// requests in the same area are served from cache. The caller still gets
/// the live answer for its exact box.
#[derive(Debug)]
pub struct ElementsService {
    cache: Arc<dyn Cache>,
    provider: Arc<dyn ElementsProvider>,
    config: ElementsServiceConfig,
}

impl ElementsService {
    pub fn new(cache: Arc<dyn Cache>, provider: Arc<dyn ElementsProvider>) -> Self {
        Self::with_config(cache, provider, ElementsServiceConfig::default())
    }

    pub fn with_config(
        cache: Arc<dyn Cache>,
        provider: Arc<dyn ElementsProvider>,
        config: ElementsServiceConfig,
    ) -> Self {
        Self {
            cache,
            provider,
            config,
        }
    }

    pub async fn get_elements(&self, bbox: &BoundingBox) -> Result<ElementsResult, DomainError> {
        let cell = bbox.cell();
        let key = cell.cache_key();

        if let Some(cached) = self.lookup(&key).await {
            debug!(key = %key, elements = cached.len(), "Serving elements from cell cache");
            return Ok(cached);
        }

        self.spawn_cell_warmer(cell, key);

        let started = Instant::now();
        let result = self.provider.fetch_elements(bbox).await;
        record_upstream_request(
            self.provider.provider_name(),
            result.is_ok(),
            started.elapsed(),
        );

        result
    }

    async fn lookup(&self, key: &str) -> Option<ElementsResult> {
        match self.cache.get::<ElementsResult>(key).await {
            Ok(Some(result)) => {
                record_cache_lookup(OVERPASS_NAMESPACE, CacheOutcome::Hit);
                Some(result)
            }
            Ok(None) => {
                record_cache_lookup(OVERPASS_NAMESPACE, CacheOutcome::Miss);
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cell cache read failed, treating as miss");
                record_cache_lookup(OVERPASS_NAMESPACE, CacheOutcome::Error);
                None
            }
        }
    }

    fn spawn_cell_warmer(&self, cell: GeoCell, key: String) {
        let cache = self.cache.clone();
        let provider = self.provider.clone();
        let ttl = self.config.cell_ttl;

        tokio::spawn(async move {
            let started = Instant::now();
            let fetched = provider.fetch_elements(&cell.bounds()).await;
            record_upstream_request(provider.provider_name(), fetched.is_ok(), started.elapsed());

            match fetched {
                Ok(result) => {
                    let result = result.into_cached();
                    match cache.set(&key, &result, ttl).await {
                        Ok(()) => debug!(key = %key, elements = result.len(), "Warmed cell"),
                        Err(e) => error!(key = %key, error = %e, "Failed to store warmed cell"),
                    }
                }
                Err(e) => error!(key = %key, error = %e, "Cell warm-up fetch failed"),
            }
        });
    }
}
