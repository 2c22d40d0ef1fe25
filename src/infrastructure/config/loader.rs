use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::collections::HashSet;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    #[error("Invalid interval_secs: {0}. Must be at least 1")]
    InvalidInterval(u64),

    #[error("Invalid probe_timeout_secs: {0}. Must be at least 1")]
    InvalidProbeTimeout(u64),

    #[error("Backend service directory candidates cannot be empty")]
    EmptyServiceDirs,

    #[error("Backend entry point cannot be empty")]
    EmptyEntryPoint,

    #[error("Invalid backend port: 0")]
    InvalidPort,

    #[error("At least one route must be declared")]
    NoRoutes,

    #[error("Duplicate route path: {0}")]
    DuplicateRoute(String),

    #[error("Invalid weight {weight} for route {route}. Must be non-negative")]
    NegativeWeight { route: String, weight: f64 },

    #[error("Invalid max_queue_secs {max_queue_secs} for route {route}. Must be positive")]
    NonPositiveQueueWait { route: String, max_queue_secs: f64 },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .usher/config.yaml (node config)
    /// 3. .usher/local.yaml (local overrides, optional)
    /// 4. Environment variables (USHER_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".usher/config.yaml"))
            .merge(Yaml::file(".usher/local.yaml"))
            .merge(Env::prefixed("USHER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.health.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(config.health.max_attempts));
        }

        if config.health.interval_secs == 0 {
            return Err(ConfigError::InvalidInterval(config.health.interval_secs));
        }

        if config.health.probe_timeout_secs == 0 {
            return Err(ConfigError::InvalidProbeTimeout(
                config.health.probe_timeout_secs,
            ));
        }

        if config.backend.service_dirs.is_empty() {
            return Err(ConfigError::EmptyServiceDirs);
        }

        if config.backend.entry_point.is_empty() {
            return Err(ConfigError::EmptyEntryPoint);
        }

        if config.backend.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if config.routes.is_empty() {
            return Err(ConfigError::NoRoutes);
        }

        // Route paths are the handoff's keys; the router indexes by them
        let mut seen = HashSet::new();
        for route in &config.routes {
            if !seen.insert(route.route.as_str()) {
                return Err(ConfigError::DuplicateRoute(route.route.clone()));
            }

            if route.weight < 0.0 {
                return Err(ConfigError::NegativeWeight {
                    route: route.route.clone(),
                    weight: route.weight,
                });
            }

            if route.max_queue_secs <= 0.0 {
                return Err(ConfigError::NonPositiveQueueWait {
                    route: route.route.clone(),
                    max_queue_secs: route.max_queue_secs,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RouteConfig;

    #[test]
    fn default_config_validates() {
        assert!(ConfigLoader::validate(&Config::default()).is_ok());
    }

    #[test]
    fn zero_attempts_rejected() {
        let mut config = Config::default();
        config.health.max_attempts = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxAttempts(0))
        ));
    }

    #[test]
    fn duplicate_routes_rejected() {
        let mut config = Config::default();
        config.routes.push(RouteConfig {
            route: "/generate".to_string(),
            allow_parallel: false,
            max_queue_secs: 10.0,
            weight: 1.0,
        });

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::DuplicateRoute(r)) if r == "/generate"
        ));
    }

    #[test]
    fn negative_weight_rejected() {
        let mut config = Config::default();
        config.routes[0].weight = -1.0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn empty_service_dirs_rejected() {
        let mut config = Config::default();
        config.backend.service_dirs.clear();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyServiceDirs)
        ));
    }
}
