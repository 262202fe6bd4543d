use birthcare_core::observability::logging::{init_tracing, init_tracing_local};
use birthcare_service::config::BirthcareConfig;
use birthcare_service::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BirthcareConfig::from_env()?;

    match config.observability.otlp_endpoint.as_deref() {
        Some(endpoint) => init_tracing(
            &config.service_name,
            &config.observability.log_level,
            endpoint,
        ),
        None => init_tracing_local(&config.observability.log_level),
    }

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting birthcare-service"
    );

    let application = Application::build(config).await?;

    tokio::select! {
        result = application.run_until_stopped() => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, stopping");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
