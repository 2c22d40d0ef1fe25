use std::path::PathBuf;
use thiserror::Error;

/// Fatal bootstrap errors.
///
/// Every variant terminates the controller with a non-zero exit. Warnings
/// from environment preparation are not errors and never appear here; they
/// live in [`PrepareSummary`](crate::infrastructure::prepare::PrepareSummary).
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("no backend to supervise: {entry_point} not found in any of {candidates:?}")]
    ServiceDirNotFound {
        entry_point: String,
        candidates: Vec<PathBuf>,
    },

    #[error("failed to open log sink {path}: {source}")]
    LogSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn backend {interpreter} {entry_point}: {source}")]
    SpawnFailed {
        interpreter: PathBuf,
        entry_point: String,
        #[source]
        source: std::io::Error,
    },

    #[error("backend did not become healthy within {attempts} attempts ({elapsed_secs}s)")]
    HealthGateTimeout { attempts: u32, elapsed_secs: u64 },
}
