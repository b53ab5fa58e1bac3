//! Subsystem probes.
//!
//! # Responsibilities
//! - Define the capability a subsystem implements to report its health
//! - Classify probes as required or optional
//!
//! # Design Decisions
//! - Probes receive the deadline they must finish by; the aggregator
//!   enforces it regardless
//! - A probe reports `Err` for failure; it should not panic, but a panic is
//!   contained by the aggregator

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::time::Instant;

use crate::health::status::HealthStatus;

/// Why a probe produced no verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("probe failed: {0}")]
    Failed(String),

    #[error("probe timed out after {0:?}")]
    TimedOut(Duration),

    #[error("probe panicked")]
    Panicked,
}

/// A health check for one subsystem.
pub trait Probe: Send + Sync {
    fn check(&self, deadline: Instant) -> BoxFuture<'_, Result<HealthStatus, ProbeError>>;
}

impl<F> Probe for F
where
    F: Fn(Instant) -> BoxFuture<'static, Result<HealthStatus, ProbeError>> + Send + Sync,
{
    fn check(&self, deadline: Instant) -> BoxFuture<'_, Result<HealthStatus, ProbeError>> {
        self(deadline)
    }
}

/// How a failing probe affects the overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
    /// Failure makes the service unhealthy.
    Required,
    /// Failure degrades the service at most.
    Optional,
}

impl Criticality {
    /// Contribution of a probe verdict to the overall status.
    pub fn cap(self, status: HealthStatus) -> HealthStatus {
        match self {
            Criticality::Required => status,
            Criticality::Optional => status.min(HealthStatus::Degraded),
        }
    }
}

/// A probe registered under a name.
#[derive(Clone)]
pub struct RegisteredProbe {
    pub name: String,
    pub criticality: Criticality,
    pub probe: Arc<dyn Probe>,
}

impl std::fmt::Debug for RegisteredProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredProbe")
            .field("name", &self.name)
            .field("criticality", &self.criticality)
            .finish_non_exhaustive()
    }
}
