use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health gate state machine.
///
/// The gate starts in `Starting`, moves to `Ready` on the first successful
/// probe, or to `Failed` once the attempt ceiling is exhausted. There are no
/// other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// Polling in progress, no success yet
    Starting,
    /// First successful probe observed; polling has stopped
    Ready,
    /// Attempt ceiling exhausted without a success
    Failed,
}

/// Outcome of a single health probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProbeResult {
    /// When the probe completed
    pub timestamp: DateTime<Utc>,

    /// Whether the probe observed an HTTP 200
    pub success: bool,

    /// HTTP status code, when a response was received at all
    pub status: Option<u16>,
}

impl HealthProbeResult {
    /// Record a probe outcome stamped with the current time.
    pub fn now(success: bool, status: Option<u16>) -> Self {
        Self {
            timestamp: Utc::now(),
            success,
            status,
        }
    }
}

/// Final report from a successful health gate run
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Terminal state the gate reached
    pub state: HealthState,

    /// Attempts issued, counting the successful one
    pub attempts: u32,

    /// Most recent probe outcome
    pub last_probe: HealthProbeResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_result_records_status() {
        let probe = HealthProbeResult::now(false, Some(503));
        assert!(!probe.success);
        assert_eq!(probe.status, Some(503));
    }

    #[test]
    fn probe_result_without_response_has_no_status() {
        let probe = HealthProbeResult::now(false, None);
        assert_eq!(probe.status, None);
    }
}
