// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-driven configuration, grounded on the original `Config`
//! class: the same variable names and defaults, loaded once at process
//! startup rather than read as class attributes.

use crate::error::{OrchestratorError, Result};
use std::env;
use std::time::Duration;

/// Orchestrator-wide configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub redis_url: String,
    pub use_redis: bool,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub max_retries: u32,
    pub worker_timeout: Duration,
    pub schedule_interval: Duration,
    pub environment: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379/0".to_string(),
            use_redis: true,
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
            max_retries: 3,
            worker_timeout: Duration::from_secs(300),
            schedule_interval: Duration::from_secs(5),
            environment: "development".to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from the environment, falling back to the
    /// documented defaults for anything unset.
    ///
    /// `ENVIRONMENT=production` forces `USE_REDIS=true` regardless of the
    /// `USE_REDIS` variable, matching `ProductionConfig` in the original.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let mut use_redis = parse_bool_var("USE_REDIS", defaults.use_redis)?;
        let mut debug = parse_bool_var("DEBUG", defaults.debug)?;
        if environment == "production" {
            use_redis = true;
            debug = false;
        } else if environment == "development" && env::var("USE_REDIS").is_err() {
            use_redis = false;
        }

        Ok(Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            use_redis,
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_numeric_var("PORT", defaults.port)?,
            debug,
            max_retries: parse_numeric_var("MAX_RETRIES", defaults.max_retries)?,
            worker_timeout: Duration::from_secs(parse_numeric_var(
                "WORKER_TIMEOUT",
                defaults.worker_timeout.as_secs(),
            )?),
            schedule_interval: Duration::from_secs(parse_numeric_var(
                "SCHEDULE_INTERVAL",
                defaults.schedule_interval.as_secs(),
            )?),
            environment,
        })
    }
}

fn parse_bool_var(name: &'static str, default: bool) -> Result<bool> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(OrchestratorError::validation(format!(
                "{name} must be \"true\" or \"false\", got {raw:?}"
            ))),
        },
    }
}

fn parse_numeric_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|_| OrchestratorError::validation(format!("{name} must be numeric, got {raw:?}"))),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
