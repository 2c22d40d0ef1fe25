//! Command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use self::commands::config::ConfigArgs;
use self::commands::preflight::PreflightArgs;
use self::commands::up::UpArgs;

/// Usher - node bootstrap and health-gated handoff controller
#[derive(Parser, Debug)]
#[command(name = "usher", version, about)]
pub struct Cli {
    /// Load configuration from this file instead of .usher/
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full bootstrap sequence and hand off to the router
    Up(UpArgs),

    /// Report precondition and filesystem resolution without changing anything
    Preflight(PreflightArgs),

    /// Print the effective merged configuration
    Config(ConfigArgs),
}

/// Print a diagnostic for `err` and terminate with a non-zero exit.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        eprintln!("{}", serde_json::json!({ "error": format!("{err:#}") }));
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
