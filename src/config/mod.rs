// src/config/mod.rs
//! Service configuration read from the process environment (and `.env`).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_PROVIDER_KEY: &str = "PROVIDER_KEY";
pub const ENV_DATA_ENDPOINT: &str = "DATA_ENDPOINT";
pub const ENV_PORT: &str = "ROUNDER_API_PORT";
pub const ENV_INGEST_DIR: &str = "INGEST_DIR";
pub const ENV_PROVIDER_TIMEOUT_SECS: &str = "PROVIDER_TIMEOUT_SECS";

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_INGEST_DIR: &str = "./repo";

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub provider_key: String,
    /// Provider URL pattern with `_KEY_` / `_SUBJECT_` placeholders.
    pub data_endpoint: String,
    pub port: u16,
    pub ingest_dir: PathBuf,
    pub provider_timeout: Option<Duration>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider_key", &"<redacted>")
            .field("data_endpoint", &self.data_endpoint)
            .field("port", &self.port)
            .field("ingest_dir", &self.ingest_dir)
            .field("provider_timeout", &self.provider_timeout)
            .finish()
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        let provider_key = get(ENV_PROVIDER_KEY).ok_or(ConfigError::Missing(ENV_PROVIDER_KEY))?;
        let data_endpoint =
            get(ENV_DATA_ENDPOINT).ok_or(ConfigError::Missing(ENV_DATA_ENDPOINT))?;

        let port = match get(ENV_PORT) {
            Some(p) => p.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: ENV_PORT,
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let ingest_dir = get(ENV_INGEST_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INGEST_DIR));

        let provider_timeout = match get(ENV_PROVIDER_TIMEOUT_SECS) {
            Some(s) => {
                let secs = s.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: ENV_PROVIDER_TIMEOUT_SECS,
                    message: e.to_string(),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            provider_key,
            data_endpoint,
            port,
            ingest_dir,
            provider_timeout,
        })
    }

    /// Create the ingest directory (and parents) if it is not there yet.
    pub async fn prepare_storage(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.ingest_dir).await
    }
}
