use std::path::PathBuf;

use super::route::{ReadinessSignals, RouteDeclaration};

/// Everything the external router needs to take over request admission.
///
/// Built once, after the health gate reports READY, and passed to the
/// [`RequestRouter`](crate::domain::ports::RequestRouter) collaborator.
/// Nothing flows back: once the router has this, the controller's only
/// remaining job is to mirror the router's exit status, if it ever exits.
#[derive(Debug, Clone)]
pub struct RouterHandoff {
    /// Base URL of the backend, without port
    pub base_url: String,

    /// Local port the backend serves on
    pub port: u16,

    /// Log sink carrying the backend's merged stdout/stderr
    pub log_path: PathBuf,

    /// Route policy set, in declaration order, route paths unique
    pub routes: Vec<RouteDeclaration>,

    /// Log substrings for out-of-band lifecycle classification
    pub signals: ReadinessSignals,
}
