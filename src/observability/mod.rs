//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request context (opentelemetry::Context)
//!     → trace_context.rs (trace id, span id, sampled)
//!     → hook.rs (optional diagnostic sink, e.g. tracing)
//!
//! Process-wide:
//!     → telemetry.rs (tracer provider + W3C propagator)
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//! ```
//!
//! # Design Decisions
//! - Extraction only reads an established context; it never fails
//! - The diagnostic hook is passed explicitly, not looked up globally
//! - Structured logging (JSON) for machine parsing

pub mod hook;
pub mod logging;
pub mod metrics;
pub mod telemetry;
pub mod trace_context;

pub use hook::{DiagnosticEvent, DiagnosticHook, HookSlot, TracingHook};
pub use telemetry::Telemetry;
pub use trace_context::{trace_info, TraceContextReader, TraceInfo};
