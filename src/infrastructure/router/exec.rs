//! Exec adapter for the external request router.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::domain::models::{RouterConfig, RouterHandoff};
use crate::domain::ports::RequestRouter;

/// Wire form of the handoff, as the external router reads it.
#[derive(Debug, Serialize)]
struct WireHandoff {
    model_server_url: String,
    model_server_port: u16,
    model_log_file: String,
    handlers: Vec<WireHandler>,
    on_load: Vec<String>,
    on_error: Vec<String>,
}

#[derive(Debug, Serialize)]
struct WireHandler {
    route: String,
    allow_parallel_requests: bool,
    max_queue_time: f64,
    workload: f64,
}

/// Hands control to the router by serializing the handoff to a JSON file and
/// executing the configured router command with that path appended.
///
/// The process boundary can only carry scalar weights: calculators offering
/// a fixed weight are carried exactly, payload-dependent ones are evaluated
/// against an empty payload. An in-process router implementation receives
/// the calculators themselves and has no such restriction.
pub struct ExecRouter {
    config: RouterConfig,
}

impl ExecRouter {
    /// Create the adapter from its configuration.
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    fn wire_form(handoff: &RouterHandoff) -> WireHandoff {
        let empty = Value::Object(Map::new());

        WireHandoff {
            model_server_url: handoff.base_url.clone(),
            model_server_port: handoff.port,
            model_log_file: handoff.log_path.display().to_string(),
            handlers: handoff
                .routes
                .iter()
                .map(|decl| WireHandler {
                    route: decl.route.clone(),
                    allow_parallel_requests: decl.allow_parallel,
                    max_queue_time: decl.max_queue_wait.as_secs_f64(),
                    workload: decl
                        .workload
                        .fixed_weight()
                        .unwrap_or_else(|| decl.workload.weight(&empty)),
                })
                .collect(),
            on_load: handoff.signals.on_load.clone(),
            on_error: handoff.signals.on_error.clone(),
        }
    }

    fn write_handoff_file(&self, handoff: &RouterHandoff) -> Result<()> {
        if let Some(parent) = self.config.handoff_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create handoff directory {}", parent.display())
            })?;
        }

        let wire = Self::wire_form(handoff);
        let json = serde_json::to_string_pretty(&wire).context("failed to serialize handoff")?;
        std::fs::write(&self.config.handoff_path, json).with_context(|| {
            format!(
                "failed to write handoff file {}",
                self.config.handoff_path.display()
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl RequestRouter for ExecRouter {
    async fn run(&self, handoff: RouterHandoff) -> Result<()> {
        self.write_handoff_file(&handoff)?;

        info!(
            command = %self.config.command,
            handoff = %self.config.handoff_path.display(),
            routes = handoff.routes.len(),
            "Handing off to request router"
        );

        let mut child = tokio::process::Command::new(&self.config.command)
            .args(&self.config.args)
            .arg(&self.config.handoff_path)
            .spawn()
            .with_context(|| format!("failed to spawn router {}", self.config.command))?;

        // Under normal operation this wait never completes
        let status = child
            .wait()
            .await
            .context("failed to wait on router process")?;

        if status.success() {
            info!("Router exited cleanly");
            Ok(())
        } else {
            error!(%status, "Router exited");
            anyhow::bail!("router exited with {status}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        ConstantWeight, ReadinessSignals, RouteDeclaration, SignalsConfig,
    };
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    fn sample_handoff(log_path: PathBuf) -> RouterHandoff {
        RouterHandoff {
            base_url: "http://127.0.0.1".to_string(),
            port: 8080,
            log_path,
            routes: vec![
                RouteDeclaration {
                    route: "/generate".to_string(),
                    allow_parallel: true,
                    max_queue_wait: Duration::from_secs(180),
                    workload: Arc::new(ConstantWeight(100.0)),
                },
                RouteDeclaration {
                    route: "/status".to_string(),
                    allow_parallel: true,
                    max_queue_wait: Duration::from_secs(5),
                    workload: Arc::new(ConstantWeight(1.0)),
                },
            ],
            signals: ReadinessSignals::from(&SignalsConfig::default()),
        }
    }

    #[test]
    fn wire_form_carries_fixed_weights_and_order() {
        let wire = ExecRouter::wire_form(&sample_handoff(PathBuf::from("/var/log/x.log")));

        assert_eq!(wire.model_server_port, 8080);
        assert_eq!(wire.handlers.len(), 2);
        assert_eq!(wire.handlers[0].route, "/generate");
        assert_eq!(wire.handlers[0].workload, 100.0);
        assert_eq!(wire.handlers[0].max_queue_time, 180.0);
        assert_eq!(wire.handlers[1].route, "/status");
        assert_eq!(wire.handlers[1].workload, 1.0);
        assert!(wire.on_load.contains(&"Uvicorn running on".to_string()));
    }

    #[tokio::test]
    async fn handoff_file_is_written_before_exec() {
        let tmp = tempfile::tempdir().unwrap();
        let handoff_path = tmp.path().join("run").join("handoff.json");

        let router = ExecRouter::new(RouterConfig {
            command: "true".to_string(),
            args: vec![],
            handoff_path: handoff_path.clone(),
        });

        router
            .run(sample_handoff(tmp.path().join("server.log")))
            .await
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&handoff_path).unwrap()).unwrap();
        assert_eq!(written["model_server_port"], 8080);
        assert_eq!(written["handlers"][0]["route"], "/generate");
    }

    #[tokio::test]
    async fn router_failure_exit_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let router = ExecRouter::new(RouterConfig {
            command: "false".to_string(),
            args: vec![],
            handoff_path: tmp.path().join("handoff.json"),
        });

        let err = router
            .run(sample_handoff(tmp.path().join("server.log")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("router exited"));
    }
}
