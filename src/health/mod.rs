//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → aggregator.rs (fan out to registered probes, bounded deadline)
//!     → probe.rs (one subsystem: database, downstream ping, ...)
//!     → status.rs (worst-of folding into a HealthSnapshot)
//! ```
//!
//! # Design Decisions
//! - With no probes registered the service reports healthy
//! - Required probes can make the service unhealthy, optional ones only degraded
//! - Probe failures are data, never errors of the health call itself

pub mod aggregator;
pub mod probe;
pub mod status;

pub use aggregator::HealthAggregator;
pub use probe::{Criticality, Probe, ProbeError};
pub use status::{HealthSnapshot, HealthStatus};
