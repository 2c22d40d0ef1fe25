//! Request router port - interface to the external routing collaborator.

use async_trait::async_trait;

use crate::domain::models::RouterHandoff;

/// The external request-routing component the controller hands control to.
///
/// The router owns request admission, queuing, parallelism limits, and
/// proxying once it receives the handoff; its scheduling internals are not
/// part of this crate. `run` does not return under normal operation; the
/// controller's process lifetime becomes dependent on the router's loop.
/// When the router does stop, the controller mirrors that outcome: `Ok` for
/// a clean stop, `Err` otherwise.
#[async_trait]
pub trait RequestRouter: Send + Sync {
    /// Hand over the backend and route policy, then run indefinitely.
    async fn run(&self, handoff: RouterHandoff) -> anyhow::Result<()>;
}
