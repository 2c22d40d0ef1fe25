//! Infrastructure layer module
//!
//! Operating-system and network adapters behind the domain's ports:
//! - Configuration loading (figment)
//! - Environment preparation (display server, trust material)
//! - Backend process supervision and log sink
//! - Health gate (HTTP polling)
//! - Router handoff adapter

pub mod config;
pub mod health;
pub mod prepare;
pub mod process;
pub mod router;

pub use config::{ConfigError, ConfigLoader};
pub use health::HealthGate;
pub use prepare::{EnvironmentPreparer, PreflightCheck, PrepareSummary};
pub use process::{BackendHandle, BackendSupervisor};
pub use router::ExecRouter;
