pub mod config;
pub mod handoff;
pub mod health;
pub mod route;

pub use config::{
    BackendConfig, Config, DisplayConfig, HealthConfig, RouteConfig, RouterConfig, SignalsConfig,
    TrustConfig,
};
pub use handoff::RouterHandoff;
pub use health::{HealthProbeResult, HealthReport, HealthState};
pub use route::{ConstantWeight, ReadinessSignals, RouteDeclaration, WorkloadCalculator};
