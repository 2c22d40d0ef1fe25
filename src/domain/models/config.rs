use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Usher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Virtual display server configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Trust material (CA certificate) configuration
    #[serde(default)]
    pub trust: TrustConfig,

    /// Backend service configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Health gate configuration
    #[serde(default)]
    pub health: HealthConfig,

    /// External router configuration
    #[serde(default)]
    pub router: RouterConfig,

    /// Route declarations handed to the router
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,

    /// Log substrings the router uses to classify backend lifecycle events
    #[serde(default)]
    pub signals: SignalsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            trust: TrustConfig::default(),
            backend: BackendConfig::default(),
            health: HealthConfig::default(),
            router: RouterConfig::default(),
            routes: default_routes(),
            signals: SignalsConfig::default(),
        }
    }
}

/// Virtual display server configuration
///
/// The display server is an externally-supervised singleton: the preparer
/// spawns it when missing but never retains a handle to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DisplayConfig {
    /// Display server executable
    #[serde(default = "default_display_command")]
    pub command: String,

    /// Process name used for the liveness probe
    #[serde(default = "default_display_command")]
    pub process_name: String,

    /// Display target used when the DISPLAY environment variable is unset
    #[serde(default = "default_display_target")]
    pub target: String,

    /// Screen geometry passed to the display server
    #[serde(default = "default_screen")]
    pub screen: String,

    /// Maximum simultaneous display clients
    #[serde(default = "default_max_clients")]
    pub max_clients: u32,

    /// Milliseconds to wait after spawning the display server
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Seconds allowed for the liveness probe before it is abandoned
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

fn default_display_command() -> String {
    "Xvfb".to_string()
}

fn default_display_target() -> String {
    ":99".to_string()
}

fn default_screen() -> String {
    "800x600x8".to_string()
}

const fn default_max_clients() -> u32 {
    512
}

const fn default_settle_ms() -> u64 {
    1000
}

const fn default_probe_timeout_secs() -> u64 {
    5
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            command: default_display_command(),
            process_name: default_display_command(),
            target: default_display_target(),
            screen: default_screen(),
            max_clients: default_max_clients(),
            settle_ms: default_settle_ms(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Trust material configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrustConfig {
    /// CA certificate to import; skipped entirely when the file is absent
    #[serde(default = "default_ca_cert")]
    pub ca_cert: PathBuf,

    /// Certificate database the CA is imported into
    #[serde(default = "default_cert_db")]
    pub cert_db: String,

    /// Nickname recorded for the imported certificate
    #[serde(default = "default_cert_nickname")]
    pub nickname: String,

    /// Seconds allowed for the import command
    #[serde(default = "default_install_timeout_secs")]
    pub install_timeout_secs: u64,
}

fn default_ca_cert() -> PathBuf {
    PathBuf::from("/root/.mitmproxy/mitmproxy-ca-cert.pem")
}

fn default_cert_db() -> String {
    "sql:/root/.pki/nssdb".to_string()
}

fn default_cert_nickname() -> String {
    "mitmproxy".to_string()
}

const fn default_install_timeout_secs() -> u64 {
    10
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            ca_cert: default_ca_cert(),
            cert_db: default_cert_db(),
            nickname: default_cert_nickname(),
            install_timeout_secs: default_install_timeout_secs(),
        }
    }
}

/// Backend service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    /// Candidate service directories, checked in order; first one containing
    /// the entry point wins
    #[serde(default = "default_service_dirs")]
    pub service_dirs: Vec<PathBuf>,

    /// Entry-point file that identifies the service directory
    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    /// Candidate interpreter paths, checked in order
    ///
    /// The backend needs OS-level packages outside this controller's own
    /// dependency universe, so interpreter resolution is never shared.
    #[serde(default = "default_interpreters")]
    pub interpreters: Vec<PathBuf>,

    /// Program name resolved through PATH when no candidate path exists
    #[serde(default = "default_fallback_interpreter")]
    pub fallback_interpreter: String,

    /// Log sink collecting the backend's merged stdout/stderr
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Local port the backend serves on
    #[serde(default = "default_backend_port")]
    pub port: u16,
}

fn default_service_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("/root/service"), PathBuf::from("/workspace")]
}

fn default_entry_point() -> String {
    "app_server.py".to_string()
}

fn default_interpreters() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/bin/python3"),
        PathBuf::from("/usr/local/bin/python3"),
    ]
}

fn default_fallback_interpreter() -> String {
    "python3".to_string()
}

fn default_log_path() -> PathBuf {
    PathBuf::from("/var/log/image-gen/server.log")
}

const fn default_backend_port() -> u16 {
    8080
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            service_dirs: default_service_dirs(),
            entry_point: default_entry_point(),
            interpreters: default_interpreters(),
            fallback_interpreter: default_fallback_interpreter(),
            log_path: default_log_path(),
            port: default_backend_port(),
        }
    }
}

/// Health gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthConfig {
    /// Health endpoint path on the backend
    #[serde(default = "default_health_path")]
    pub path: String,

    /// Seconds slept between poll attempts
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Poll attempts before the gate gives up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Per-probe HTTP timeout in seconds
    #[serde(default = "default_health_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Trailing log lines surfaced when the gate fails
    #[serde(default = "default_failure_tail_lines")]
    pub failure_tail_lines: usize,
}

fn default_health_path() -> String {
    "/health".to_string()
}

const fn default_interval_secs() -> u64 {
    1
}

const fn default_max_attempts() -> u32 {
    60
}

const fn default_health_probe_timeout_secs() -> u64 {
    2
}

const fn default_failure_tail_lines() -> usize {
    20
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            path: default_health_path(),
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
            probe_timeout_secs: default_health_probe_timeout_secs(),
            failure_tail_lines: default_failure_tail_lines(),
        }
    }
}

/// External router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RouterConfig {
    /// Router executable to hand control to
    #[serde(default = "default_router_command")]
    pub command: String,

    /// Arguments passed before the handoff file path
    #[serde(default)]
    pub args: Vec<String>,

    /// Where the serialized handoff is written for the router
    #[serde(default = "default_handoff_path")]
    pub handoff_path: PathBuf,
}

fn default_router_command() -> String {
    "pyworker".to_string()
}

fn default_handoff_path() -> PathBuf {
    PathBuf::from("/run/usher/handoff.json")
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            command: default_router_command(),
            args: vec![],
            handoff_path: default_handoff_path(),
        }
    }
}

/// A single route declaration as configured
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RouteConfig {
    /// Externally reachable route path
    pub route: String,

    /// Whether the router may proxy requests on this route in parallel
    #[serde(default = "default_allow_parallel")]
    pub allow_parallel: bool,

    /// Maximum seconds a request may wait in the router's queue
    pub max_queue_secs: f64,

    /// Constant cost weight for requests on this route
    pub weight: f64,
}

const fn default_allow_parallel() -> bool {
    true
}

fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            route: "/generate".to_string(),
            allow_parallel: true,
            max_queue_secs: 180.0,
            weight: 100.0,
        },
        RouteConfig {
            route: "/status".to_string(),
            allow_parallel: true,
            max_queue_secs: 5.0,
            weight: 1.0,
        },
        RouteConfig {
            route: "/health".to_string(),
            allow_parallel: true,
            max_queue_secs: 5.0,
            weight: 1.0,
        },
    ]
}

/// Log substrings used by the router to classify backend lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SignalsConfig {
    /// Substrings marking a successful backend load
    #[serde(default = "default_on_load")]
    pub on_load: Vec<String>,

    /// Substrings marking a backend error
    #[serde(default = "default_on_error")]
    pub on_error: Vec<String>,
}

fn default_on_load() -> Vec<String> {
    vec![
        "Uvicorn running on".to_string(),
        "Application startup complete".to_string(),
    ]
}

fn default_on_error() -> Vec<String> {
    vec!["ERROR".to_string(), "Traceback".to_string()]
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            on_load: default_on_load(),
            on_error: default_on_error(),
        }
    }
}

impl Config {
    /// Resolve the display target: the DISPLAY environment variable wins,
    /// the configured target is the default when it is unset or empty.
    pub fn resolved_display(&self) -> String {
        std::env::var("DISPLAY")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.display.target.clone())
    }

    /// Base URL of the backend's local HTTP surface.
    pub fn backend_base_url(&self) -> String {
        "http://127.0.0.1".to_string()
    }

    /// Full health endpoint URL polled by the gate.
    pub fn health_url(&self) -> String {
        format!(
            "{}:{}{}",
            self.backend_base_url(),
            self.backend.port,
            self.health.path
        )
    }
}
