//! Serve command - runs the HTTP API

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{create_router, create_router_with_frontend};
use crate::config::AppConfig;
use crate::infrastructure::logging::LoggingConfig;
use crate::infrastructure::observability::{
    create_metrics_router, init_metrics, init_tracing, shutdown_tracing,
};

/// Run the API server until interrupted
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(
        &LoggingConfig {
            level: config.logging.level.clone(),
            format: config.logging.format.clone(),
        },
        &config.observability.error_reporting,
    );

    if let Some(e) = load_error {
        warn!("Failed to load configuration, using defaults: {}", e);
    }

    let state = crate::create_app_state_with_config(&config).await?;
    let app = build_app(&config, state);

    let addr = build_socket_addr(&config)?;
    info!(
        environment = ?config.environment,
        "Starting server on {}", addr
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracing();
    Ok(())
}

fn build_app(config: &AppConfig, state: crate::api::AppState) -> Router {
    let mut app = if config.environment.is_production() {
        info!(static_dir = %config.static_dir.display(), "Serving frontend");
        create_router_with_frontend(state, &config.static_dir)
    } else {
        create_router(state)
    };

    if let Some(metrics) = init_metrics(&config.observability.metrics) {
        app = app.merge(create_metrics_router(
            metrics,
            &config.observability.metrics.path,
        ));
    }

    app
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received");
}
