//! Observability infrastructure - Tracing, Metrics, and Error reporting

mod config;
mod metrics;
mod tracing_setup;

pub use config::{ErrorReportingConfig, MetricsConfig, ObservabilityConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_cache_lookup, record_http_request,
    record_upstream_request, CacheOutcome, PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
