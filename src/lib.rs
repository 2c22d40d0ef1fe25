//! Usher - Node Bootstrap and Handoff Controller
//!
//! Usher prepares a compute node's runtime environment, launches the
//! HTTP generation backend as a supervised subprocess, blocks until the
//! backend proves itself healthy, and then hands control to the external
//! request router by declaring how each route should be queued and weighted.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, error taxonomy, and ports at the
//!   collaborator seams
//! - **Application Layer** (`application`): the bootstrap sequencer
//! - **Infrastructure Layer** (`infrastructure`): OS and network adapters
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use usher::application::BootstrapSequencer;
//! use usher::infrastructure::{ConfigLoader, ExecRouter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let router = Arc::new(ExecRouter::new(config.router.clone()));
//!     BootstrapSequencer::new(config, router).run().await
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use application::BootstrapSequencer;
pub use domain::error::BootstrapError;
pub use domain::models::{
    Config, ConstantWeight, HealthProbeResult, HealthReport, HealthState, ReadinessSignals,
    RouteDeclaration, RouterHandoff, WorkloadCalculator,
};
pub use domain::ports::{Precondition, RequestRouter};
pub use infrastructure::{
    BackendHandle, BackendSupervisor, ConfigError, ConfigLoader, EnvironmentPreparer, ExecRouter,
    HealthGate,
};
