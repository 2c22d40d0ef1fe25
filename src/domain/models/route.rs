//! Route declarations and workload costing.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::config::{RouteConfig, SignalsConfig};

/// Strategy for costing a request's workload.
///
/// The router uses the returned weight for admission and queuing decisions.
/// Implementations must be pure functions of the payload.
pub trait WorkloadCalculator: Send + Sync {
    /// Non-negative weight for a single request payload.
    fn weight(&self, payload: &Value) -> f64;

    /// Fixed weight when costing does not depend on the payload.
    ///
    /// Adapters crossing a process boundary use this to carry the weight as
    /// a scalar; payload-dependent calculators return `None` and only work
    /// with in-process routers.
    fn fixed_weight(&self) -> Option<f64> {
        None
    }
}

/// Fixed-cost-per-request weight, the default costing model.
#[derive(Debug, Clone, Copy)]
pub struct ConstantWeight(pub f64);

impl WorkloadCalculator for ConstantWeight {
    fn weight(&self, _payload: &Value) -> f64 {
        self.0
    }

    fn fixed_weight(&self) -> Option<f64> {
        Some(self.0)
    }
}

/// Admission and queuing policy for one externally reachable route.
#[derive(Clone)]
pub struct RouteDeclaration {
    /// Route path, unique within the handed-off set
    pub route: String,

    /// Whether the router may proxy requests on this route in parallel
    pub allow_parallel: bool,

    /// Maximum time a request may wait in the router's queue
    pub max_queue_wait: Duration,

    /// Workload costing strategy for requests on this route
    pub workload: Arc<dyn WorkloadCalculator>,
}

impl RouteDeclaration {
    /// Build a declaration from its configured form with constant costing.
    pub fn from_config(config: &RouteConfig) -> Self {
        Self {
            route: config.route.clone(),
            allow_parallel: config.allow_parallel,
            max_queue_wait: Duration::from_secs_f64(config.max_queue_secs),
            workload: Arc::new(ConstantWeight(config.weight)),
        }
    }
}

impl fmt::Debug for RouteDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDeclaration")
            .field("route", &self.route)
            .field("allow_parallel", &self.allow_parallel)
            .field("max_queue_wait", &self.max_queue_wait)
            .field("fixed_weight", &self.workload.fixed_weight())
            .finish()
    }
}

/// The two ordered substring sets the router watches the backend log for.
///
/// A line should not match both sets; when it does, classification is the
/// router's decision.
#[derive(Debug, Clone)]
pub struct ReadinessSignals {
    /// Substrings marking a successful backend load
    pub on_load: Vec<String>,

    /// Substrings marking a backend error
    pub on_error: Vec<String>,
}

impl From<&SignalsConfig> for ReadinessSignals {
    fn from(config: &SignalsConfig) -> Self {
        Self {
            on_load: config.on_load.clone(),
            on_error: config.on_error.clone(),
        }
    }
}
