//! Precondition port - one idempotent environment requirement.

use async_trait::async_trait;

/// A single environment precondition the backend needs before launch.
///
/// The preparer runs each precondition exactly once per run: a bounded,
/// non-blocking `is_satisfied` probe, then `remedy` if unsatisfied, with no
/// re-verification afterwards. Remedies must be safe to run when the
/// precondition is already satisfied.
#[async_trait]
pub trait Precondition: Send + Sync {
    /// Short name used in logs and preflight reports.
    fn name(&self) -> &'static str;

    /// Probe whether the precondition already holds. Must complete within a
    /// bounded time; an `Err` means the probe itself could not run.
    async fn is_satisfied(&self) -> anyhow::Result<bool>;

    /// Attempt to establish the precondition. Fire-and-forget: the preparer
    /// does not probe again afterwards.
    async fn remedy(&self) -> anyhow::Result<()>;
}
