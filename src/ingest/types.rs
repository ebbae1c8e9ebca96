// src/ingest/types.rs
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::IngestError;

/// One provider article, passed through without interpretation.
pub type Article = serde_json::Map<String, serde_json::Value>;

/// Outbound transport for the provider fetch.
///
/// Implementations return the fully drained response body; the HTTP status is
/// not inspected.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, IngestError>;
    fn name(&self) -> &'static str;
}

/// Everything one ingest run needs. Built once, consumed by [`crate::ingest::run`].
#[derive(Clone)]
pub struct IngestConfig {
    pub key: String,
    pub subject: String,
    pub storage_path: PathBuf,
    /// Pattern with `_KEY_` and `_SUBJECT_` placeholders,
    /// e.g. `https://provider.com/endpoint?key=_KEY_&query=_SUBJECT_`.
    pub provider_url: String,
    pub transport: Arc<dyn Transport>,
}

impl IngestConfig {
    pub fn new(
        key: impl Into<String>,
        subject: impl Into<String>,
        storage_path: impl Into<PathBuf>,
        provider_url: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            key: key.into(),
            subject: subject.into(),
            storage_path: storage_path.into(),
            provider_url: provider_url.into(),
            transport,
        }
    }
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // key stays out of logs
        f.debug_struct("IngestConfig")
            .field("subject", &self.subject)
            .field("storage_path", &self.storage_path)
            .field("provider_url", &self.provider_url)
            .field("transport", &self.transport.name())
            .finish()
    }
}

/// Provider response envelope. Missing or `null` fields decode to their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, rename = "totalResults", deserialize_with = "null_as_default")]
    pub total_results: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }

    /// Best-effort count; anything unparsable is 0.
    pub fn total(&self) -> i64 {
        self.total_results.parse().unwrap_or(0)
    }
}

/// Summary of one ingest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResult {
    #[serde(rename = "ID")]
    pub id: String,
    pub subject: String,
    pub ingested: bool,
    pub total: i64,
}

impl fmt::Display for IngestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}::{}",
            self.id, self.subject, self.ingested, self.total
        )
    }
}
