//! Tracer provider bootstrap.
//!
//! # Responsibilities
//! - Build the in-process tracer provider (parent-based, always-on)
//! - Own the W3C trace-context propagator used on inbound requests
//! - Optionally publish both as the process-wide OpenTelemetry globals
//!
//! # Design Decisions
//! - No exporter: spans only exist to carry ids and sampling to handlers
//! - The provider is kept alive alongside its tracer; an SDK tracer whose
//!   provider was dropped produces empty span contexts

use opentelemetry::global;
use opentelemetry::propagation::{Extractor, TextMapPropagator};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Config, Sampler, Tracer, TracerProvider};

/// Tracing state shared by the HTTP layer.
pub struct Telemetry {
    provider: TracerProvider,
    tracer: Tracer,
    propagator: TraceContextPropagator,
}

impl Telemetry {
    /// Build a provider whose tracer is named after the service.
    pub fn new(service_name: impl Into<String>) -> Self {
        let provider = TracerProvider::builder()
            .with_config(
                Config::default().with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn))),
            )
            .build();
        let tracer = provider.tracer(service_name.into());

        Self {
            provider,
            tracer,
            propagator: TraceContextPropagator::new(),
        }
    }

    /// Register provider and propagator as the OpenTelemetry globals.
    pub fn install_global(&self) {
        global::set_text_map_propagator(TraceContextPropagator::new());
        let _ = global::set_tracer_provider(self.provider.clone());
        tracing::debug!("Global tracer provider installed");
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Remote parent context carried by `carrier`, or an empty context.
    pub fn extract(&self, carrier: &dyn Extractor) -> Context {
        self.propagator.extract_with_context(&Context::new(), carrier)
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry").finish_non_exhaustive()
    }
}
