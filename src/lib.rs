//! botbooker API service library.
//!
//! Liveness (`/ping`) and health (`/health`) endpoints with W3C trace
//! context propagation and a pluggable diagnostic hook.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use health::{HealthAggregator, HealthSnapshot, HealthStatus};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::{HookSlot, TraceContextReader, TraceInfo};
