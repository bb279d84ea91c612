//! Fountain Gateway
//!
//! A caching proxy in front of public geodata services:
//! - Drinking water points per bounding box (Overpass), cached per 1°×1° cell
//! - Place search (Nominatim), cached per normalized query and throttled
//! - Offline seeding of the search cache

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use config::CacheSettings;
use domain::Cache;
use infrastructure::{
    cache::{InMemoryCache, InMemoryCacheConfig, RedisCache, RedisCacheConfig},
    services::{ElementsService, SearchService, SearchServiceConfig},
    throttle::CourtesyThrottle,
    upstream::{HttpClient, NominatimClient, OverpassClient},
};
use tracing::{info, warn};

/// Connect the configured cache backend (`redis` or `in_memory`)
pub async fn create_cache(settings: &CacheSettings) -> anyhow::Result<Arc<dyn Cache>> {
    let cache: Arc<dyn Cache> = match settings.backend.as_str() {
        "redis" => {
            let mut redis_config = RedisCacheConfig::new(&settings.redis_url);

            if let Some(prefix) = &settings.key_prefix {
                redis_config = redis_config.with_key_prefix(prefix);
            }

            Arc::new(RedisCache::new(redis_config).await?)
        }
        "in_memory" => {
            let in_memory_config =
                InMemoryCacheConfig::default().with_max_capacity(settings.max_capacity);

            Arc::new(InMemoryCache::with_config(in_memory_config))
        }
        other => anyhow::bail!("Unknown cache backend: {}. Valid backends: redis, in_memory", other),
    };

    info!(backend = cache.backend_name(), "Cache initialized");

    Ok(cache)
}

/// Build the search service with its own courtesy throttle
pub fn create_search_service(
    cache: Arc<dyn Cache>,
    config: &AppConfig,
    ttl: Duration,
) -> anyhow::Result<SearchService> {
    if config.upstream.client_id.trim().is_empty() {
        warn!("upstream.client_id is not set; search requests will be rejected by the geocoder");
    }

    let http = HttpClient::with_timeout(config.upstream.timeout())?;
    let geocoder = NominatimClient::with_base_url(http, &config.upstream.nominatim_url);
    let throttle = CourtesyThrottle::new(config.search.cooldown());
    let search_config = SearchServiceConfig::new(&config.upstream.client_id).with_ttl(ttl);

    Ok(SearchService::new(
        cache,
        Arc::new(geocoder),
        Arc::new(throttle),
        search_config,
    ))
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache = create_cache(&config.cache).await?;

    let http = HttpClient::with_timeout(config.upstream.timeout())?;
    let overpass = OverpassClient::with_base_url(http, &config.upstream.overpass_url);
    let elements_service = ElementsService::new(cache.clone(), Arc::new(overpass));

    let search_service = create_search_service(cache.clone(), config, config.search.ttl())?;

    Ok(AppState::new(
        Arc::new(elements_service),
        Arc::new(search_service),
        cache,
    ))
}
