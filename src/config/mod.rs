//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, Environment, LogFormat, LoggingConfig, SearchConfig, ServerConfig,
    UpstreamConfig,
};
