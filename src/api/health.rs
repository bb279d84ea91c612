//! Health check endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;

/// Readiness response with component status
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: HealthStatus,
    pub version: String,
    pub checks: Vec<HealthCheck>,
    pub latency_ms: u64,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

/// Liveness: 200 with an empty body while the process is serving
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Readiness: verifies the cache backend answers
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let cache_check = check_cache(&state).await;
    let status = cache_check.status;

    let response = ReadinessResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: vec![cache_check],
        latency_ms: start.elapsed().as_millis() as u64,
    };

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

async fn check_cache(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let name = format!("cache:{}", state.cache.backend_name());

    match state.cache.ping().await {
        Ok(_) => HealthCheck {
            name,
            status: HealthStatus::Healthy,
            message: None,
            latency_ms: start.elapsed().as_millis() as u64,
        },
        Err(e) => HealthCheck {
            name,
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
            latency_ms: start.elapsed().as_millis() as u64,
        },
    }
}
