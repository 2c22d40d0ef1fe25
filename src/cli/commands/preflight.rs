//! The `preflight` command: non-mutating readiness report.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::prepare::{EnvironmentPreparer, PreflightCheck};
use crate::infrastructure::process::BackendSupervisor;

/// Arguments for `usher preflight`
#[derive(Args, Debug)]
pub struct PreflightArgs {}

#[derive(Debug, Serialize)]
struct PreflightReport {
    preconditions: Vec<PreflightCheck>,
    service_dir: Option<PathBuf>,
    interpreter: PathBuf,
}

/// Probe preconditions and filesystem resolution, report, change nothing.
///
/// Exits zero even when checks are unsatisfied: preflight informs, only
/// `up` enforces.
pub async fn execute(
    _args: PreflightArgs,
    config_path: Option<PathBuf>,
    json_mode: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let display = config.resolved_display();
    let preparer = EnvironmentPreparer::from_config(&config, &display);
    let supervisor = BackendSupervisor::new(config.backend.clone(), display);

    let report = PreflightReport {
        preconditions: preparer.probe_all().await,
        service_dir: supervisor.locate_service_dir().ok(),
        interpreter: supervisor.select_interpreter(),
    };

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Preconditions:");
    for check in &report.preconditions {
        let state = match check.satisfied {
            Some(true) => "satisfied",
            Some(false) => "unsatisfied",
            None => "probe failed",
        };
        println!("  {:<16} {state}", check.name);
    }

    match &report.service_dir {
        Some(dir) => println!("Service dir:     {}", dir.display()),
        None => println!(
            "Service dir:     NOT FOUND ({} missing from all candidates)",
            config.backend.entry_point
        ),
    }
    println!("Interpreter:     {}", report.interpreter.display());

    Ok(())
}
