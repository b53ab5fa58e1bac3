//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (trace context, request ID, timeout, HTTP tracing)
//! - Bind server to listener
//! - Stop gracefully on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::health::HealthAggregator;
use crate::http::handlers::{health, ping};
use crate::http::middleware::trace_context_middleware;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::{HookSlot, Telemetry, TraceContextReader, TracingHook};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub trace_reader: TraceContextReader,
    pub health: Arc<HealthAggregator>,
}

/// Collaborators the router is built from.
pub struct Components {
    /// Hook slot consulted on every trace extraction.
    pub hook: HookSlot,
    pub health: HealthAggregator,
    /// When absent, requests carry no trace context.
    pub telemetry: Option<Arc<Telemetry>>,
}

impl Components {
    /// Defaults derived from configuration: no probes, `TracingHook` when
    /// enabled, a fresh tracer provider when tracing is enabled.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let hook = HookSlot::new();
        if config.observability.trace_hook {
            hook.install(TracingHook);
        }

        let health = HealthAggregator::new(config.service_name.clone())
            .with_probe_timeout(Duration::from_secs(config.timeouts.probe_secs));

        let telemetry = config
            .observability
            .tracing_enabled
            .then(|| Arc::new(Telemetry::new(config.service_name.clone())));

        Self {
            hook,
            health,
            telemetry,
        }
    }
}

/// HTTP server for the API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let components = Components::from_config(&config);
        Self::with_components(config, components)
    }

    /// Create a server from explicitly supplied collaborators.
    pub fn with_components(config: ServiceConfig, components: Components) -> Self {
        let router = build_router(&config, components);
        Self { router, config }
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.service_name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Router clone, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServiceConfig, components: Components) -> Router {
    let state = AppState {
        trace_reader: TraceContextReader::new(components.hook),
        health: Arc::new(components.health),
    };

    let mut router = Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
        .with_state(state);

    if let Some(telemetry) = components.telemetry {
        router = router.layer(middleware::from_fn_with_state(
            telemetry,
            trace_context_middleware,
        ));
    }

    router
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Mutex;
    use tower::ServiceExt;

    use crate::health::{Criticality, HealthSnapshot, HealthStatus, ProbeError};
    use crate::http::handlers::PingResponse;
    use crate::observability::DiagnosticEvent;

    fn quiet_config() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.observability.trace_hook = false;
        config
    }

    async fn send_get(router: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, content_type, body.to_vec())
    }

    #[tokio::test]
    async fn test_ping_returns_pong() {
        let server = HttpServer::new(quiet_config());

        let (status, content_type, body) = send_get(server.router(), "/ping").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().contains("application/json"));
        assert_eq!(body, br#"{"message":"pong"}"#);
    }

    #[tokio::test]
    async fn test_health_base_case() {
        let server = HttpServer::new(quiet_config());

        let (status, content_type, body) = send_get(server.router(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().contains("application/json"));
        let snapshot: HealthSnapshot = serde_json::from_slice(&body).unwrap();
        assert_eq!(snapshot, HealthSnapshot::healthy("botbooker-api"));
    }

    #[tokio::test]
    async fn test_health_reports_failing_probe_with_200() {
        let config = quiet_config();
        let mut components = Components::from_config(&config);
        components.health = components.health.register(
            "database",
            Criticality::Required,
            |_deadline: tokio::time::Instant| -> futures_util::future::BoxFuture<'static, Result<HealthStatus, ProbeError>> {
                Box::pin(async { Err(ProbeError::Failed("refused".into())) })
            },
        );
        let server = HttpServer::with_components(config, components);

        let (status, _, body) = send_get(server.router(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["detail"]["database"], "unhealthy");
    }

    #[tokio::test]
    async fn test_ping_feeds_hook_once_per_request() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();

        let config = quiet_config();
        let components = Components {
            hook: HookSlot::with_hook(move |event: &DiagnosticEvent<'_>| {
                sink.lock().unwrap().push(event.to_string());
            }),
            ..Components::from_config(&config)
        };
        let router = HttpServer::with_components(config, components).router();

        send_get(router.clone(), "/ping").await;
        send_get(router.clone(), "/health").await;
        send_get(router, "/ping").await;

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.contains("traceID:") && l.contains("spanID:")));
        assert!(lines[0].ends_with("isSampled: true"));
    }

    #[tokio::test]
    async fn test_ping_without_tracing_feeds_empty_triple() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();

        let mut config = quiet_config();
        config.observability.tracing_enabled = false;
        let components = Components {
            hook: HookSlot::with_hook(move |event: &DiagnosticEvent<'_>| {
                sink.lock().unwrap().push(event.to_string());
            }),
            ..Components::from_config(&config)
        };
        let router = HttpServer::with_components(config, components).router();

        send_get(router, "/ping").await;

        assert_eq!(
            lines.lock().unwrap().as_slice(),
            ["traceID: ; spanID: ; isSampled: false"]
        );
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let server = HttpServer::new(quiet_config());

        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[test]
    fn test_components_follow_config() {
        let mut config = quiet_config();
        config.service_name = "bookings".to_string();
        config.observability.tracing_enabled = false;

        let components = Components::from_config(&config);
        assert!(!components.hook.is_installed());
        assert!(components.telemetry.is_none());
        assert_eq!(components.health.service_name(), "bookings");
        assert_eq!(components.health.probe_count(), 0);

        let server = HttpServer::with_components(config, components);
        assert_eq!(server.config().service_name, "bookings");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _, _) = send_get(HttpServer::new(quiet_config()).router(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_ping_response_shape() {
        let body = serde_json::to_string(&PingResponse {
            message: "pong".into(),
        })
        .unwrap();
        assert_eq!(body, r#"{"message":"pong"}"#);
    }
}
