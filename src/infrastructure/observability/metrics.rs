//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("fountain_gateway_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Outcome of a cache read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
    Error,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Error => "error",
        }
    }
}

/// Record a cache lookup in a key namespace (`overpass`, `osm`)
pub fn record_cache_lookup(namespace: &'static str, outcome: CacheOutcome) {
    counter!(
        "geo_cache_lookups_total",
        "namespace" => namespace,
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record an outbound request to an upstream provider
pub fn record_upstream_request(provider: &'static str, success: bool, duration: Duration) {
    let labels = [
        ("provider", provider.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("upstream_requests_total", &labels).increment(1);
    histogram!("upstream_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record an HTTP request metric. `path` must be a route pattern or another
/// fixed label, never a raw request URI.
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_outcome_labels() {
        assert_eq!(CacheOutcome::Hit.as_str(), "hit");
        assert_eq!(CacheOutcome::Miss.as_str(), "miss");
        assert_eq!(CacheOutcome::Error.as_str(), "error");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_cache_lookup("osm", CacheOutcome::Hit);
        record_upstream_request("overpass", false, Duration::from_millis(20));
        record_http_request("GET", "/api/health", 200, Duration::from_millis(1));
    }

    #[test]
    fn test_http_request_series_per_label_set() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_http_request("GET", "/api/health", 200, Duration::from_millis(1));
            record_http_request("GET", "/api/health", 200, Duration::from_millis(2));
            record_http_request("GET", "/api/search", 500, Duration::from_millis(3));
        });

        let rendered = handle.render();
        let series = |name: &str, path: &str| {
            rendered
                .lines()
                .find(|line| line.starts_with(name) && line.contains(path))
                .map(str::to_string)
        };

        let health = series("http_requests_total{", r#"path="/api/health""#).unwrap();
        assert!(health.ends_with(" 2"));

        let errors = series("http_server_errors_total{", r#"path="/api/search""#).unwrap();
        assert!(errors.ends_with(" 1"));
    }
}
