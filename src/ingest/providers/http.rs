use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;

use crate::error::IngestError;
use crate::ingest::types::Transport;

/// Provider transport backed by `reqwest`.
///
/// No timeout is set unless the caller asks for one.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, IngestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(IngestError::fetch)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_builder() => {
                return Err(IngestError::request(format!("building provider request: {e}")));
            }
            Err(e) => {
                counter!("ingest_provider_errors_total").increment(1);
                return Err(IngestError::fetch(e));
            }
        };

        let status = resp.status();
        // Body is read in full regardless of status; decode decides what it means.
        let body = resp.bytes().await.map_err(|e| {
            counter!("ingest_provider_errors_total").increment(1);
            IngestError::fetch(e)
        })?;
        if !status.is_success() {
            tracing::debug!(%status, "provider returned non-2xx status");
        }
        Ok(body.to_vec())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
