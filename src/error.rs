// src/error.rs
//! Error types for the ingest pipeline and service configuration.

use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of one ingest run. Each variant maps to the stage that stopped it.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The provider URL could not be built from the pattern.
    #[error("request construction failed: {0}")]
    Request(String),

    /// The outbound fetch failed (connection, DNS, timeout, body read).
    #[error("provider fetch failed: {0}")]
    Fetch(#[source] BoxError),

    /// The provider body is not a valid response envelope.
    #[error("provider response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The articles document could not be written.
    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    pub fn fetch(source: impl Into<BoxError>) -> Self {
        Self::Fetch(source.into())
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Short stage label, used as a metrics/log field.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Fetch(_) => "fetch",
            Self::Decode(_) => "decode",
            Self::Write { .. } => "write",
        }
    }
}

/// Startup configuration problems. Fatal: the service does not start.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} env is missing")]
    Missing(&'static str),

    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },
}
