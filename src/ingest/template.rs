// src/ingest/template.rs
use crate::error::IngestError;

pub const KEY_TOKEN: &str = "_KEY_";
pub const SUBJECT_TOKEN: &str = "_SUBJECT_";

/// Fill the provider pattern with key and subject.
///
/// Only the first `_KEY_` and the first `_SUBJECT_` are replaced. Nothing is
/// escaped: the pattern is expected to carry its own percent-encoding.
pub fn render_url(pattern: &str, key: &str, subject: &str) -> Result<String, IngestError> {
    if pattern.trim().is_empty() {
        return Err(IngestError::request("provider url pattern is empty"));
    }

    let target = pattern
        .replacen(KEY_TOKEN, key, 1)
        .replacen(SUBJECT_TOKEN, subject, 1);

    let parsed = url::Url::parse(&target)
        .map_err(|e| IngestError::request(format!("invalid provider url: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(target),
        other => Err(IngestError::request(format!(
            "unsupported provider url scheme '{other}'"
        ))),
    }
}
