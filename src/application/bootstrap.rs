//! Bootstrap sequencer
//!
//! The ordered, failure-aware sequence that takes a node from cold to
//! routed: environment preparation, backend launch, health gating, and the
//! final handoff to the external router. Phases run strictly one after
//! another; nothing flows back into the controller once the handoff occurs.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::models::{Config, ReadinessSignals, RouteDeclaration, RouterHandoff};
use crate::domain::ports::RequestRouter;
use crate::infrastructure::health::HealthGate;
use crate::infrastructure::prepare::EnvironmentPreparer;
use crate::infrastructure::process::{tail_lines, BackendHandle, BackendSupervisor};

/// Orchestrates the four bootstrap phases against a router collaborator.
pub struct BootstrapSequencer {
    config: Config,
    router: Arc<dyn RequestRouter>,
}

impl BootstrapSequencer {
    /// Create a sequencer over the given configuration and router.
    pub fn new(config: Config, router: Arc<dyn RequestRouter>) -> Self {
        Self { config, router }
    }

    /// Run prepare → launch → health-gate → handoff.
    ///
    /// Returns an error for the two fatal cases (no backend entry point,
    /// health gate exhaustion) and whenever the router stops uncleanly.
    /// Preparation failures are warnings only. Under normal operation this
    /// never returns: the router's run loop owns the process from the
    /// handoff onward.
    pub async fn run(&self) -> Result<()> {
        let display = self.config.resolved_display();

        // Phase 1: preconditions, best-effort
        let preparer = EnvironmentPreparer::from_config(&self.config, &display);
        let summary = preparer.prepare().await;
        if !summary.warnings.is_empty() {
            warn!(
                warnings = summary.warnings.len(),
                "Environment preparation finished with warnings"
            );
        }

        // Phase 2: launch, fatal if the backend cannot be found
        let supervisor = BackendSupervisor::new(self.config.backend.clone(), display);
        let handle = supervisor.launch().await?;
        info!(
            pid = ?handle.pid(),
            service_dir = %handle.service_dir.display(),
            "Backend launched"
        );

        // Phase 3: health gate, fatal on exhaustion
        let gate = HealthGate::new(self.config.health_url(), &self.config.health);
        match gate.await_healthy().await {
            Ok(report) => {
                info!(attempts = report.attempts, "Health gate passed");
            }
            Err(err) => {
                self.surface_failure_diagnostics(&handle);
                return Err(err.into());
            }
        }

        // Phase 4: handoff; the router owns the process from here
        let handoff = self.build_handoff(&handle);
        self.router.run(handoff).await
    }

    /// Assemble the route policy set and backend coordinates for the router.
    fn build_handoff(&self, handle: &BackendHandle) -> RouterHandoff {
        RouterHandoff {
            base_url: self.config.backend_base_url(),
            port: self.config.backend.port,
            log_path: handle.log_path.clone(),
            routes: self
                .config
                .routes
                .iter()
                .map(RouteDeclaration::from_config)
                .collect(),
            signals: ReadinessSignals::from(&self.config.signals),
        }
    }

    /// Print the trailing log excerpt after a failed health gate.
    fn surface_failure_diagnostics(&self, handle: &BackendHandle) {
        error!(
            log = %handle.log_path.display(),
            "Backend never became healthy; trailing log follows"
        );

        match tail_lines(&handle.log_path, self.config.health.failure_tail_lines) {
            Ok(lines) => {
                for line in lines {
                    eprintln!("  {line}");
                }
            }
            Err(err) => {
                warn!(error = %err, "Could not read backend log for diagnostics");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::BootstrapError;
    use crate::domain::models::{BackendConfig, DisplayConfig, TrustConfig};
    use std::path::PathBuf;

    struct RefusingRouter;

    #[async_trait::async_trait]
    impl RequestRouter for RefusingRouter {
        async fn run(&self, _handoff: RouterHandoff) -> Result<()> {
            panic!("handoff must not be reached");
        }
    }

    #[tokio::test]
    async fn missing_entry_point_fails_before_launch() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            backend: BackendConfig {
                service_dirs: vec![tmp.path().join("empty")],
                log_path: tmp.path().join("server.log"),
                ..BackendConfig::default()
            },
            // Preparation stays inert for the test
            display: DisplayConfig {
                command: "true".to_string(),
                process_name: "usher-no-such-process".to_string(),
                settle_ms: 0,
                ..DisplayConfig::default()
            },
            trust: TrustConfig {
                ca_cert: PathBuf::from("/nonexistent/ca.pem"),
                ..TrustConfig::default()
            },
            ..Config::default()
        };

        let sequencer = BootstrapSequencer::new(config, Arc::new(RefusingRouter));
        let err = sequencer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BootstrapError>(),
            Some(BootstrapError::ServiceDirNotFound { .. })
        ));
    }
}
