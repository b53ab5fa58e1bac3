//! Health verdicts and snapshots.
//!
//! # States
//! - Healthy: every probe passed (or none is registered)
//! - Degraded: an optional subsystem is failing
//! - Unhealthy: a required subsystem is failing
//!
//! # Precedence
//! ```text
//! Unhealthy > Degraded > Healthy   (worst-of folding)
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Health verdict, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// The more severe of the two.
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    pub service: String,
    /// Per-probe verdicts; absent when no probe is registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<BTreeMap<String, HealthStatus>>,
}

impl HealthSnapshot {
    pub fn healthy(service: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            detail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_of_precedence() {
        use HealthStatus::*;

        assert_eq!(Healthy.worst(Degraded), Degraded);
        assert_eq!(Unhealthy.worst(Degraded), Unhealthy);
        assert_eq!(Healthy.worst(Healthy), Healthy);
        assert_eq!([Degraded, Healthy, Unhealthy].into_iter().max(), Some(Unhealthy));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = HealthSnapshot::healthy("botbooker-api");
        assert_eq!(
            serde_json::to_string(&snapshot).unwrap(),
            r#"{"status":"healthy","service":"botbooker-api"}"#
        );

        let mut detail = BTreeMap::new();
        detail.insert("database".to_string(), HealthStatus::Unhealthy);
        let snapshot = HealthSnapshot {
            status: HealthStatus::Unhealthy,
            service: "botbooker-api".into(),
            detail: Some(detail),
        };
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            serde_json::json!({
                "status": "unhealthy",
                "service": "botbooker-api",
                "detail": { "database": "unhealthy" }
            })
        );
    }
}
