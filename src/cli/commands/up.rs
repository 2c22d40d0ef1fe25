//! The `up` command: run the bootstrap sequence.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::BootstrapSequencer;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::router::ExecRouter;

/// Arguments for `usher up`
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Override the backend port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the health gate attempt ceiling
    #[arg(long)]
    pub health_attempts: Option<u32>,
}

/// Run prepare → launch → health-gate → handoff.
///
/// Does not return while the router is running; any return is a failure or
/// a router exit.
pub async fn execute(args: UpArgs, config_path: Option<PathBuf>, _json_mode: bool) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(port) = args.port {
        config.backend.port = port;
    }
    if let Some(attempts) = args.health_attempts {
        config.health.max_attempts = attempts;
    }
    ConfigLoader::validate(&config)?;

    let router = Arc::new(ExecRouter::new(config.router.clone()));
    let sequencer = BootstrapSequencer::new(config, router);
    sequencer.run().await
}
