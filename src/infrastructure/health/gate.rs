//! Health gate: bounded polling until the backend proves itself.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::error::BootstrapError;
use crate::domain::models::{HealthConfig, HealthProbeResult, HealthReport, HealthState};

/// Polls the backend's health endpoint until it answers 200 or the attempt
/// ceiling is reached.
///
/// Every non-200 outcome, whether an error status or a transport failure,
/// counts identically as "not yet ready". No failure class short-circuits
/// the wait, and there is no cancellation path: the gate runs until success
/// or exhaustion.
pub struct HealthGate {
    url: String,
    interval: Duration,
    max_attempts: u32,
    probe_timeout: Duration,
    client: reqwest::Client,
}

impl HealthGate {
    /// Create a gate for `url` from the health configuration.
    pub fn new(url: String, config: &HealthConfig) -> Self {
        Self::with_params(
            url,
            Duration::from_secs(config.interval_secs),
            config.max_attempts,
            Duration::from_secs(config.probe_timeout_secs),
        )
    }

    /// Create a gate with explicit timing parameters.
    pub fn with_params(
        url: String,
        interval: Duration,
        max_attempts: u32,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            url,
            interval,
            max_attempts,
            probe_timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Poll until READY or FAILED.
    ///
    /// Sleeps the fixed interval between attempts but not after the last
    /// one, so a success on attempt N waits ~(N-1) intervals in total.
    pub async fn await_healthy(&self) -> Result<HealthReport, BootstrapError> {
        let state = HealthState::Starting;
        info!(
            url = %self.url,
            state = ?state,
            max_attempts = self.max_attempts,
            "Waiting for backend health"
        );

        for attempt in 1..=self.max_attempts {
            let probe = self.probe().await;

            if probe.success {
                info!(attempt, "Backend is healthy");
                return Ok(HealthReport {
                    state: HealthState::Ready,
                    attempts: attempt,
                    last_probe: probe,
                });
            }

            debug!(
                attempt,
                max_attempts = self.max_attempts,
                status = ?probe.status,
                "Backend not ready yet"
            );

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        warn!(
            state = ?HealthState::Failed,
            attempts = self.max_attempts,
            "Health gate exhausted"
        );

        Err(BootstrapError::HealthGateTimeout {
            attempts: self.max_attempts,
            elapsed_secs: u64::from(self.max_attempts.saturating_sub(1)) * self.interval.as_secs(),
        })
    }

    /// One bounded-timeout GET against the health endpoint.
    async fn probe(&self) -> HealthProbeResult {
        let request = self.client.get(&self.url).timeout(self.probe_timeout);
        match request.send().await {
            Ok(response) => {
                let status = response.status();
                HealthProbeResult::now(status == reqwest::StatusCode::OK, Some(status.as_u16()))
            }
            // Transport failures count the same as a non-200 status
            Err(_) => HealthProbeResult::now(false, None),
        }
    }
}
