// tests/app_config.rs
use rounder::config::{AppConfig, ENV_DATA_ENDPOINT, ENV_PORT, ENV_PROVIDER_KEY};
use rounder::error::ConfigError;
use std::env;

fn clear() {
    for k in [ENV_PROVIDER_KEY, ENV_DATA_ENDPOINT, ENV_PORT] {
        env::remove_var(k);
    }
}

#[serial_test::serial]
#[test]
fn from_env_requires_key_then_endpoint() {
    clear();
    assert_eq!(
        AppConfig::from_env().unwrap_err(),
        ConfigError::Missing(ENV_PROVIDER_KEY)
    );

    env::set_var(ENV_PROVIDER_KEY, "a-key");
    assert_eq!(
        AppConfig::from_env().unwrap_err(),
        ConfigError::Missing(ENV_DATA_ENDPOINT)
    );
    clear();
}

#[serial_test::serial]
#[test]
fn from_env_reads_port_override() {
    clear();
    env::set_var(ENV_PROVIDER_KEY, "a-key");
    env::set_var(ENV_DATA_ENDPOINT, "https://p.test/?k=_KEY_&q=_SUBJECT_");
    env::set_var(ENV_PORT, "8123");

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8123);
    assert_eq!(cfg.provider_key, "a-key");
    assert!(!format!("{cfg:?}").contains("a-key"), "key must be redacted");
    clear();
}
