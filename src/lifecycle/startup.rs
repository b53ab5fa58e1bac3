//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems from the validated configuration
//! - Start background endpoints (metrics)
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)
//! - The diagnostic hook is installed before the listener accepts traffic
//! - Shutdown is subscribed before the first await, so a signal received
//!   during startup still stops the server

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::{Components, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run the service with `config` until `shutdown` fires.
pub async fn launch(config: ServiceConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let shutdown_rx = shutdown.subscribe();
    let components = Components::from_config(&config);
    let tracing_enabled = components.telemetry.is_some();
    if let Some(telemetry) = &components.telemetry {
        telemetry.install_global();
    }

    tracing::info!(
        service = %config.service_name,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        trace_hook = components.hook.is_installed(),
        tracing_enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    // A trigger sent before `shutdown_rx` existed is only visible through the latch.
    if shutdown.is_triggered() {
        tracing::info!("Shutdown requested during startup");
    } else {
        let server = HttpServer::with_components(config, components);
        server.run(listener, shutdown_rx).await?;
    }

    if tracing_enabled {
        opentelemetry::global::shutdown_tracer_provider();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn local_config() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.observability.trace_hook = false;
        config.observability.tracing_enabled = false;
        config
    }

    #[tokio::test]
    async fn test_trigger_before_launch_returns() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(5), launch(local_config(), &shutdown))
            .await
            .expect("launch ignored an earlier shutdown trigger");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_trigger_during_startup_stops_server() {
        let shutdown = Shutdown::new();
        let launched = launch(local_config(), &shutdown);
        tokio::pin!(launched);

        // Drive launch up to its first await, then fire before the bind completes.
        let early = tokio::time::timeout(Duration::ZERO, &mut launched).await;
        assert!(early.is_err());
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(5), launched)
            .await
            .expect("launch did not observe the shutdown trigger");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bind_failure_reported() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = local_config();
        config.listener.bind_address = taken.local_addr().unwrap().to_string();

        let err = launch(config, &Shutdown::new()).await.unwrap_err();

        assert!(matches!(err, StartupError::Bind { .. }));
    }
}
