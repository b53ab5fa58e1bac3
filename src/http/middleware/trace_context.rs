//! Trace context middleware.
//!
//! Extracts the W3C `traceparent`/`tracestate` of an inbound request, opens a
//! server span beneath it and stores the resulting `opentelemetry::Context`
//! in the request extensions. Handlers read it back with [`RequestContext`].

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::propagation::Extractor;
use opentelemetry::trace::{SpanKind, TraceContextExt, Tracer};
use opentelemetry::Context;

use crate::observability::Telemetry;

/// Header view usable by OpenTelemetry propagators.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|key| key.as_str()).collect()
    }
}

pub async fn trace_context_middleware(
    State(telemetry): State<Arc<Telemetry>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let parent = telemetry.extract(&HeaderExtractor(request.headers()));

    let tracer = telemetry.tracer();
    let span = tracer
        .span_builder(format!("{} {}", request.method(), request.uri().path()))
        .with_kind(SpanKind::Server)
        .start_with_context(tracer, &parent);
    let cx = parent.with_span(span);

    request.extensions_mut().insert(cx);
    next.run(request).await
}

/// The request's execution context; empty when no middleware attached one.
#[derive(Debug, Clone, Default)]
pub struct RequestContext(pub Context);

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestContext(
            parts.extensions.get::<Context>().cloned().unwrap_or_default(),
        ))
    }
}
