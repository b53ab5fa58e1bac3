//! Health aggregation.
//!
//! # Responsibilities
//! - Produce a `HealthSnapshot` on demand
//! - Fan out to registered probes concurrently, each bounded by a deadline
//! - Fold probe verdicts worst-of into the overall status
//!
//! # Design Decisions
//! - No caching: every call reflects probe results at that instant
//! - A failing, timed-out or panicking probe is folded into `detail` as
//!   unhealthy; it never fails the call

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use futures_util::FutureExt;
use tokio::time::{timeout_at, Instant};

use crate::health::probe::{Criticality, Probe, ProbeError, RegisteredProbe};
use crate::health::status::{HealthSnapshot, HealthStatus};

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Builds health snapshots for one service.
#[derive(Debug, Clone)]
pub struct HealthAggregator {
    service_name: String,
    probe_timeout: Duration,
    probes: Vec<RegisteredProbe>,
}

impl HealthAggregator {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            probes: Vec::new(),
        }
    }

    /// Upper bound for any single probe.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Register `probe` under `name`.
    pub fn register<P>(mut self, name: impl Into<String>, criticality: Criticality, probe: P) -> Self
    where
        P: Probe + 'static,
    {
        self.probes.push(RegisteredProbe {
            name: name.into(),
            criticality,
            probe: Arc::new(probe),
        });
        self
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }

    /// Snapshot bounded by the configured probe timeout.
    pub async fn check(&self) -> HealthSnapshot {
        self.check_until(Instant::now() + self.probe_timeout).await
    }

    /// Snapshot whose probes must finish by `deadline`.
    pub async fn check_until(&self, deadline: Instant) -> HealthSnapshot {
        if self.probes.is_empty() {
            return HealthSnapshot::healthy(&self.service_name);
        }

        let deadline = deadline.min(Instant::now() + self.probe_timeout);
        let verdicts = join_all(self.probes.iter().map(|p| run_probe(p, deadline))).await;

        let mut status = HealthStatus::Healthy;
        let mut detail = BTreeMap::new();
        for (registered, verdict) in self.probes.iter().zip(verdicts) {
            status = status.worst(registered.criticality.cap(verdict));
            detail.insert(registered.name.clone(), verdict);
        }

        HealthSnapshot {
            status,
            service: self.service_name.clone(),
            detail: Some(detail),
        }
    }
}

async fn run_probe(registered: &RegisteredProbe, deadline: Instant) -> HealthStatus {
    let started = Instant::now();
    let probe = async { registered.probe.check(deadline).await };

    let outcome = match timeout_at(deadline, AssertUnwindSafe(probe).catch_unwind()).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(ProbeError::Panicked),
        Err(_) => Err(ProbeError::TimedOut(deadline.saturating_duration_since(started))),
    };

    match outcome {
        Ok(status) => {
            if status != HealthStatus::Healthy {
                tracing::warn!(probe = %registered.name, status = %status, "Health probe not healthy");
            }
            status
        }
        Err(e) => {
            tracing::warn!(probe = %registered.name, error = %e, "Health probe failed");
            HealthStatus::Unhealthy
        }
    }
}
