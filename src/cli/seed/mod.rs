//! Seed command - pre-warms the search cache

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::services::{SeedService, MAX_PREFIX_LEN, SEED_TTL};

/// Arguments for the seed command
#[derive(Args, Clone, Debug)]
pub struct SeedArgs {
    /// Redis address (overrides `cache.redis_url` and forces the Redis backend)
    #[arg(long)]
    pub redis_url: Option<String>,

    /// Client identifier sent to the geocoder (overrides `upstream.client_id`)
    #[arg(long)]
    pub client_id: Option<String>,

    /// Longest prefix to seed
    #[arg(long, default_value_t = MAX_PREFIX_LEN as u8, value_parser = clap::value_parser!(u8).range(1..=MAX_PREFIX_LEN as i64))]
    pub max_length: u8,
}

impl SeedArgs {
    /// Layers the command line over the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.redis_url {
            config.cache.backend = "redis".to_string();
            config.cache.redis_url = url.clone();
        }

        if let Some(client_id) = &self.client_id {
            config.upstream.client_id = client_id.clone();
        }
    }
}

/// Run the seeder to completion
pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    args.apply(&mut config);

    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    if config.upstream.client_id.trim().is_empty() {
        anyhow::bail!("A client identifier is required: pass --client-id or set APP__UPSTREAM__CLIENT_ID");
    }

    let cache = crate::create_cache(&config.cache).await?;
    let search = crate::create_search_service(cache, &config, SEED_TTL)?;
    let seeder = SeedService::new(std::sync::Arc::new(search));

    info!(max_length = args.max_length, "Seeding search cache");
    let report = seeder.run(args.max_length as usize).await;

    info!(
        fetched = report.fetched,
        skipped = report.skipped,
        failed = report.failed,
        total = report.total(),
        "Seeding complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let args = SeedArgs {
            redis_url: Some("redis://cache:6379".to_string()),
            client_id: Some("fountain-seeder".to_string()),
            max_length: 3,
        };
        let mut config = AppConfig::default();
        config.cache.backend = "in_memory".to_string();

        args.apply(&mut config);

        assert_eq!(config.cache.backend, "redis");
        assert_eq!(config.cache.redis_url, "redis://cache:6379");
        assert_eq!(config.upstream.client_id, "fountain-seeder");
    }

    #[test]
    fn test_apply_keeps_config_without_flags() {
        let args = SeedArgs {
            redis_url: None,
            client_id: None,
            max_length: 1,
        };
        let mut config = AppConfig::default();
        config.upstream.client_id = "from-config".to_string();

        args.apply(&mut config);

        assert_eq!(config.cache.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.upstream.client_id, "from-config");
    }
}
