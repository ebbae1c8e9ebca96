// src/ingest/repository.rs
use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::IngestError;
use crate::ingest::types::Article;

/// Encode articles as one JSON document. `serde_json` never HTML-escapes, so
/// `&`, `<` and `>` stay literal. Ends with a newline.
pub fn encode_articles(articles: &[Article]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = serde_json::to_vec(articles)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Create or truncate `path` and write the whole document in one call.
///
/// The parent directory must already exist. No fsync and no rename: a crash
/// mid-write can leave a truncated file.
pub async fn write_articles(path: &Path, articles: &[Article]) -> Result<(), IngestError> {
    let data = encode_articles(articles).map_err(|e| encode_error(path, e))?;

    let mut opts = tokio::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    opts.mode(0o666);

    let mut file = opts
        .open(path)
        .await
        .map_err(|e| IngestError::write(path, e))?;
    file.write_all(&data)
        .await
        .map_err(|e| IngestError::write(path, e))?;
    file.flush().await.map_err(|e| IngestError::write(path, e))?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "articles written");
    Ok(())
}

// Encoding belongs to the persist stage, not to the provider decode.
fn encode_error(path: &Path, e: serde_json::Error) -> IngestError {
    IngestError::write(path, std::io::Error::other(e))
}

/// Read an articles document back.
pub async fn read_articles(path: &Path) -> anyhow::Result<Vec<Article>> {
    use anyhow::Context;

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading articles from {}", path.display()))?;
    let articles = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing articles in {}", path.display()))?;
    Ok(articles)
}
