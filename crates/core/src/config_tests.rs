// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

const VARS: &[&str] = &[
    "ENVIRONMENT",
    "USE_REDIS",
    "REDIS_URL",
    "HOST",
    "PORT",
    "DEBUG",
    "MAX_RETRIES",
    "WORKER_TIMEOUT",
    "SCHEDULE_INTERVAL",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_match_the_documented_values_when_unset() {
    clear_env();
    let config = OrchestratorConfig::from_env().unwrap();
    assert_eq!(config.redis_url, "redis://localhost:6379/0");
    assert!(!config.use_redis);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 5000);
    assert!(!config.debug);
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.worker_timeout, Duration::from_secs(300));
    assert_eq!(config.schedule_interval, Duration::from_secs(5));
    clear_env();
}

#[test]
#[serial]
fn production_environment_forces_redis_on() {
    clear_env();
    env::set_var("ENVIRONMENT", "production");
    env::set_var("USE_REDIS", "false");
    let config = OrchestratorConfig::from_env().unwrap();
    assert!(config.use_redis);
    assert!(!config.debug);
    clear_env();
}

#[test]
#[serial]
fn explicit_vars_override_defaults() {
    clear_env();
    env::set_var("PORT", "8080");
    env::set_var("MAX_RETRIES", "7");
    env::set_var("USE_REDIS", "true");
    let config = OrchestratorConfig::from_env().unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.max_retries, 7);
    assert!(config.use_redis);
    clear_env();
}

#[test]
#[serial]
fn non_numeric_port_is_a_validation_error() {
    clear_env();
    env::set_var("PORT", "not-a-number");
    let err = OrchestratorConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("PORT"));
    clear_env();
}

#[test]
#[serial]
fn non_boolean_use_redis_is_a_validation_error() {
    clear_env();
    env::set_var("USE_REDIS", "maybe");
    let err = OrchestratorConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("USE_REDIS"));
    clear_env();
}
