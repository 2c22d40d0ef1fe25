//! Environment preparation.
//!
//! Best-effort, idempotent preconditions run before the backend launches.
//! Nothing here is fatal: the health gate downstream is the real arbiter of
//! whether the node is usable.

pub mod display;
pub mod trust;

pub use display::DisplayServer;
pub use trust::TrustMaterial;

use tracing::{debug, info, warn};

use crate::domain::models::Config;
use crate::domain::ports::Precondition;

/// One precondition's probe outcome, as reported by preflight.
#[derive(Debug, serde::Serialize)]
pub struct PreflightCheck {
    /// Precondition name
    pub name: &'static str,

    /// `Some(true)` satisfied, `Some(false)` unsatisfied, `None` probe failed
    pub satisfied: Option<bool>,
}

/// Outcome of one preparation pass.
#[derive(Debug, Default)]
pub struct PrepareSummary {
    /// Preconditions attempted, in order
    pub attempted: Vec<&'static str>,

    /// Non-fatal warnings collected along the way
    pub warnings: Vec<String>,
}

/// Runs each precondition exactly once, collecting warnings.
pub struct EnvironmentPreparer {
    preconditions: Vec<Box<dyn Precondition>>,
}

impl EnvironmentPreparer {
    /// Assemble the standard precondition set for a node.
    pub fn from_config(config: &Config, display: &str) -> Self {
        Self::new(vec![
            Box::new(DisplayServer::new(
                config.display.clone(),
                display.to_string(),
            )),
            Box::new(TrustMaterial::new(config.trust.clone())),
        ])
    }

    /// Build a preparer over an explicit precondition list.
    pub fn new(preconditions: Vec<Box<dyn Precondition>>) -> Self {
        Self { preconditions }
    }

    /// Probe every precondition without remedying anything.
    ///
    /// Used by preflight reporting; mutates nothing.
    pub async fn probe_all(&self) -> Vec<PreflightCheck> {
        let mut checks = Vec::with_capacity(self.preconditions.len());
        for precondition in &self.preconditions {
            checks.push(PreflightCheck {
                name: precondition.name(),
                satisfied: precondition.is_satisfied().await.ok(),
            });
        }
        checks
    }

    /// Run every precondition once, in declared order.
    ///
    /// Check failures skip the remedy; remedy failures are recorded and
    /// skipped past. Neither stops the sequence, so this never fails and is
    /// safe to run again on a restart.
    pub async fn prepare(&self) -> PrepareSummary {
        let mut summary = PrepareSummary::default();

        for precondition in &self.preconditions {
            let name = precondition.name();
            summary.attempted.push(name);

            match precondition.is_satisfied().await {
                Ok(true) => {
                    debug!(precondition = name, "Already satisfied");
                }
                Ok(false) => {
                    if let Err(err) = precondition.remedy().await {
                        warn!(precondition = name, error = %err, "Remedy failed, continuing");
                        summary.warnings.push(format!("{name}: {err:#}"));
                    } else {
                        info!(precondition = name, "Remedied");
                    }
                }
                Err(err) => {
                    warn!(precondition = name, error = %err, "Check failed, continuing");
                    summary.warnings.push(format!("{name}: {err:#}"));
                }
            }
        }

        summary
    }
}
