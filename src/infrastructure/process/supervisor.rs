//! Backend subprocess supervision.
//!
//! Launch-and-forget: the supervisor resolves where the backend lives and
//! what runs it, wires its output into the log sink, and starts it. It
//! deliberately defines no stop or restart operation. Liveness is observed
//! only through the log sink and the health endpoint, and restarts belong
//! to whatever process manager invoked this controller.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::info;

use crate::domain::error::BootstrapError;
use crate::domain::models::BackendConfig;

/// Handle to a launched backend.
///
/// Owns the only reference to the child process. No termination operation is
/// defined on purpose, and the child is not killed when the handle drops.
pub struct BackendHandle {
    child: Child,

    /// Service directory the backend was launched from
    pub service_dir: PathBuf,

    /// Interpreter that runs the backend
    pub interpreter: PathBuf,

    /// Log sink collecting the backend's merged output
    pub log_path: PathBuf,
}

impl BackendHandle {
    /// OS process id, when the child is still attached.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }
}

/// Resolves the backend's location and runtime, then launches it.
pub struct BackendSupervisor {
    config: BackendConfig,
    display: String,
}

impl BackendSupervisor {
    /// Create a supervisor for the given backend and display target.
    pub fn new(config: BackendConfig, display: String) -> Self {
        Self { config, display }
    }

    /// First candidate directory containing the entry-point file.
    pub fn locate_service_dir(&self) -> Result<PathBuf, BootstrapError> {
        self.config
            .service_dirs
            .iter()
            .find(|dir| dir.join(&self.config.entry_point).is_file())
            .cloned()
            .ok_or_else(|| BootstrapError::ServiceDirNotFound {
                entry_point: self.config.entry_point.clone(),
                candidates: self.config.service_dirs.clone(),
            })
    }

    /// First existing interpreter candidate, else the PATH fallback.
    pub fn select_interpreter(&self) -> PathBuf {
        self.config
            .interpreters
            .iter()
            .find(|path| path.exists())
            .cloned()
            .unwrap_or_else(|| PathBuf::from(&self.config.fallback_interpreter))
    }

    /// Launch the backend, truncating the log sink first.
    pub async fn launch(&self) -> Result<BackendHandle, BootstrapError> {
        let service_dir = self.locate_service_dir()?;
        let interpreter = self.select_interpreter();

        let sink = self.open_log_sink()?;
        let stderr_sink = sink.try_clone().map_err(|source| BootstrapError::LogSink {
            path: self.config.log_path.clone(),
            source,
        })?;

        info!(
            service_dir = %service_dir.display(),
            interpreter = %interpreter.display(),
            log = %self.config.log_path.display(),
            "Launching backend"
        );

        let child = Command::new(&interpreter)
            .arg(&self.config.entry_point)
            .current_dir(&service_dir)
            .env("DISPLAY", &self.display)
            .stdout(Stdio::from(sink))
            .stderr(Stdio::from(stderr_sink))
            .spawn()
            .map_err(|source| BootstrapError::SpawnFailed {
                interpreter: interpreter.clone(),
                entry_point: self.config.entry_point.clone(),
                source,
            })?;

        Ok(BackendHandle {
            child,
            service_dir,
            interpreter,
            log_path: self.config.log_path.clone(),
        })
    }

    /// Open the log sink for writing, truncating prior content.
    ///
    /// Both child streams share this file handle, so their interleaving is
    /// preserved in write order.
    fn open_log_sink(&self) -> Result<File, BootstrapError> {
        if let Some(parent) = self.config.log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| BootstrapError::LogSink {
                path: self.config.log_path.clone(),
                source,
            })?;
        }

        File::create(&self.config.log_path).map_err(|source| BootstrapError::LogSink {
            path: self.config.log_path.clone(),
            source,
        })
    }
}

/// Last `count` lines of the file at `path`, fewer if the file is shorter.
///
/// Used only on the failure path, after the health gate has given up, so a
/// plain read races nothing that matters.
pub fn tail_lines(path: &Path, count: usize) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    Ok(lines[start..].iter().map(ToString::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn backend_config(dirs: Vec<PathBuf>, log_path: PathBuf) -> BackendConfig {
        BackendConfig {
            service_dirs: dirs,
            entry_point: "app_server.py".to_string(),
            interpreters: vec![PathBuf::from("/nonexistent/python3")],
            fallback_interpreter: "python3".to_string(),
            log_path,
            port: 8080,
        }
    }

    #[test]
    fn no_candidate_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let supervisor = BackendSupervisor::new(
            backend_config(
                vec![tmp.path().join("a"), tmp.path().join("b")],
                tmp.path().join("server.log"),
            ),
            ":99".to_string(),
        );

        let err = supervisor.locate_service_dir().unwrap_err();
        assert!(matches!(err, BootstrapError::ServiceDirNotFound { .. }));
    }

    #[test]
    fn second_candidate_wins_when_first_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        std::fs::write(second.join("app_server.py"), "").unwrap();

        let supervisor = BackendSupervisor::new(
            backend_config(vec![first, second.clone()], tmp.path().join("server.log")),
            ":99".to_string(),
        );

        assert_eq!(supervisor.locate_service_dir().unwrap(), second);
    }

    #[test]
    fn interpreter_falls_back_to_path_name() {
        let tmp = tempfile::tempdir().unwrap();
        let supervisor = BackendSupervisor::new(
            backend_config(vec![tmp.path().to_path_buf()], tmp.path().join("server.log")),
            ":99".to_string(),
        );

        assert_eq!(supervisor.select_interpreter(), PathBuf::from("python3"));
    }

    #[test]
    fn tail_returns_at_most_count_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..30 {
            writeln!(file, "line {i}").unwrap();
        }

        let tail = tail_lines(file.path(), 20).unwrap();
        assert_eq!(tail.len(), 20);
        assert_eq!(tail.first().unwrap(), "line 10");
        assert_eq!(tail.last().unwrap(), "line 29");
    }

    #[test]
    fn tail_of_short_file_returns_everything() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "only line").unwrap();

        let tail = tail_lines(file.path(), 20).unwrap();
        assert_eq!(tail, vec!["only line".to_string()]);
    }

    #[tokio::test]
    async fn launch_truncates_the_log_sink() {
        let tmp = tempfile::tempdir().unwrap();
        let service = tmp.path().join("service");
        std::fs::create_dir_all(&service).unwrap();
        std::fs::write(service.join("app_server.py"), "echo started").unwrap();

        let log_path = tmp.path().join("server.log");
        std::fs::write(&log_path, "stale content from a previous run\n").unwrap();

        let mut config = backend_config(vec![service], log_path.clone());
        config.interpreters = vec![PathBuf::from("/bin/sh")];

        let supervisor = BackendSupervisor::new(config, ":99".to_string());
        let handle = supervisor.launch().await.unwrap();
        assert!(handle.pid().is_some());

        // Give the child a moment to run and write
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(!content.contains("stale content"));
        assert!(content.contains("started"));
    }
}
