use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, runtime, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter: the configured level for our own crates, with the
/// chattiest dependencies pinned to warn. `RUST_LOG` overrides everything.
fn default_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},sqlx=warn,hyper=warn,tower_http=info", log_level))
    })
}

/// Initialize the tracing stack: env-filter, JSON fmt layer and an OTLP
/// export pipeline tagged with the service name.
pub fn init_tracing(service_name: &str, log_level: &str, otlp_endpoint: &str) {
    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    let tracer =
        match opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(otlp_exporter)
            .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                KeyValue::new("service.name", service_name.to_string()),
            ])))
            .install_batch(runtime::Tokio)
        {
            Ok(t) => t,
            Err(e) => {
                eprintln!(
                    "Failed to initialize OTLP tracer for service '{}' at endpoint '{}': {}",
                    service_name, otlp_endpoint, e
                );
                panic!("Failed to initialize OTLP tracer: {}", e);
            }
        };

    let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(default_filter(log_level))
        .with(telemetry)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .init();
}

/// Plain fmt-only initialization for local runs and tests where no OTLP
/// collector is reachable.
pub fn init_tracing_local(log_level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(log_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}
