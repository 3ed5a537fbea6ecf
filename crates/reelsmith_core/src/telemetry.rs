//! OpenTelemetry integration for span export during development.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
};
use opentelemetry_stdout::SpanExporter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with a stdout span exporter alongside human-readable logs.
///
/// `default_directive` is used when `RUST_LOG` is unset.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_telemetry(default_directive: &str) -> Result<(), Box<dyn std::error::Error>> {
    let provider = TracerProvider::builder()
        .with_simple_exporter(SpanExporter::default())
        .with_id_generator(RandomIdGenerator::default())
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(Resource::default())
        .build();

    let tracer = provider.tracer("reelsmith");
    opentelemetry::global::set_tracer_provider(provider);

    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
    };

    let telemetry_layer = tracing_opentelemetry::layer()
        .with_tracer(tracer)
        .with_filter(filter());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending spans and shut the tracer provider down.
///
/// Call this before application exit to ensure all spans are exported.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}
