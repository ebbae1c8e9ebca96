// src/ingest/provider.rs
use metrics::{counter, histogram};

use crate::error::IngestError;
use crate::ingest::types::{Envelope, Transport};

/// Decode a provider body. No status check happens before this, so error pages
/// from the provider surface here as decode failures.
pub fn decode_envelope(body: &[u8]) -> Result<Envelope, IngestError> {
    Ok(serde_json::from_slice(body)?)
}

/// Issue the single GET and decode the envelope.
pub async fn fetch_envelope(transport: &dyn Transport, url: &str) -> Result<Envelope, IngestError> {
    let t0 = std::time::Instant::now();

    let body = match transport.get(url).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, transport = transport.name(), "provider fetch error");
            return Err(e);
        }
    };

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("ingest_fetch_ms").record(ms);
    tracing::debug!(bytes = body.len(), ms, "provider body received");

    let envelope = decode_envelope(&body)?;
    counter!("ingest_articles_total").increment(envelope.articles.len() as u64);
    Ok(envelope)
}
