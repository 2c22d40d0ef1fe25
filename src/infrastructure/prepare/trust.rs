//! Trust material precondition.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

use crate::domain::models::TrustConfig;
use crate::domain::ports::Precondition;

/// CA certificate import into the node's certificate database.
///
/// Vacuously satisfied when no certificate file is present. The import
/// command is idempotent: re-adding an already-trusted certificate succeeds.
pub struct TrustMaterial {
    config: TrustConfig,
}

impl TrustMaterial {
    /// Create the precondition from its configuration.
    pub fn new(config: TrustConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Precondition for TrustMaterial {
    fn name(&self) -> &'static str {
        "trust-material"
    }

    async fn is_satisfied(&self) -> Result<bool> {
        // Nothing to install when the certificate is absent
        Ok(!self.config.ca_cert.exists())
    }

    async fn remedy(&self) -> Result<()> {
        info!(cert = %self.config.ca_cert.display(), "Installing CA certificate");

        let import = Command::new("certutil")
            .args(["-d", &self.config.cert_db])
            .args(["-A", "-t", "C,,"])
            .args(["-n", &self.config.nickname])
            .arg("-i")
            .arg(&self.config.ca_cert)
            .output();

        let output = tokio::time::timeout(
            Duration::from_secs(self.config.install_timeout_secs),
            import,
        )
        .await
        .context("certificate import timed out")?
        .context("failed to run certificate import")?;

        if !output.status.success() {
            anyhow::bail!(
                "certificate import exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn absent_certificate_is_vacuously_satisfied() {
        let precondition = TrustMaterial::new(TrustConfig {
            ca_cert: PathBuf::from("/nonexistent/ca-cert.pem"),
            ..TrustConfig::default()
        });
        assert!(precondition.is_satisfied().await.unwrap());
    }

    #[tokio::test]
    async fn present_certificate_needs_remedy() {
        let cert = tempfile::NamedTempFile::new().unwrap();
        let precondition = TrustMaterial::new(TrustConfig {
            ca_cert: cert.path().to_path_buf(),
            ..TrustConfig::default()
        });
        assert!(!precondition.is_satisfied().await.unwrap());
    }
}
