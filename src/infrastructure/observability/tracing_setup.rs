//! Tracing subscriber setup with optional OTLP error reporting

use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use tonic::metadata::{MetadataMap, MetadataValue};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use super::config::ErrorReportingConfig;
use crate::config::LogFormat;
use crate::infrastructure::logging::LoggingConfig;

const API_KEY_HEADER: &str = "x-api-key";

/// Initialize tracing, exporting spans and error events when a reporting
/// key is configured
pub fn init_tracing(logging_config: &LoggingConfig, reporting: &ErrorReportingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging_config.level));

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match logging_config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    let Some(key) = reporting.active_key() else {
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(filter)
            .init();

        tracing::info!("Tracing initialized (error reporting disabled)");
        return;
    };

    match init_otel_tracing(reporting, key) {
        Ok(tracer_provider) => {
            let tracer = tracer_provider.tracer("fountain-gateway");
            opentelemetry::global::set_tracer_provider(tracer_provider);
            let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

            tracing_subscriber::registry()
                .with(fmt_layer)
                .with(telemetry_layer)
                .with(filter)
                .init();

            tracing::info!(
                "Tracing initialized with error reporting to {}",
                reporting.endpoint
            );
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(fmt_layer)
                .with(filter)
                .init();

            tracing::warn!(
                "Failed to initialize error reporting: {}. Continuing without it.",
                e
            );
        }
    }
}

fn api_key_metadata(key: &str) -> Result<MetadataMap, opentelemetry::trace::TraceError> {
    let value = MetadataValue::try_from(key)
        .map_err(|e| format!("Invalid error reporting key: {}", e))?;

    let mut metadata = MetadataMap::new();
    metadata.insert(API_KEY_HEADER, value);
    Ok(metadata)
}

fn init_otel_tracing(
    config: &ErrorReportingConfig,
    key: &str,
) -> Result<TracerProvider, opentelemetry::trace::TraceError> {
    let resource = Resource::new(vec![KeyValue::new(
        "service.name",
        config.service_name.clone(),
    )]);

    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.endpoint)
        .with_metadata(api_key_metadata(key)?)
        .build()?;

    let provider = TracerProvider::builder()
        .with_sampler(sampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();

    Ok(provider)
}

/// Shutdown tracing and flush pending spans
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Tracing shutdown complete");
}
