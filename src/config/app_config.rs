use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Built frontend served in production
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// `redis` or `in_memory`
    #[serde(default = "default_cache_backend")]
    pub backend: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default)]
    pub key_prefix: Option<String>,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Identifies this deployment to the geocoder (sent as User-Agent)
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_ttl_secs")]
    pub ttl_secs: u64,
    /// Minimum spacing between geocoder calls
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl SearchConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_cache_backend() -> String {
    "redis".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_overpass_url() -> String {
    "https://overpass.kumi.systems".to_string()
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_search_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_cooldown_ms() -> u64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            environment: Environment::default(),
            logging: LoggingConfig::default(),
            cache: CacheSettings::default(),
            upstream: UpstreamConfig::default(),
            search: SearchConfig::default(),
            observability: ObservabilityConfig::default(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            redis_url: default_redis_url(),
            key_prefix: None,
            max_capacity: default_max_capacity(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            overpass_url: default_overpass_url(),
            nominatim_url: default_nominatim_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_search_ttl_secs(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
