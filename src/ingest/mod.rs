// src/ingest/mod.rs
pub mod identifier;
pub mod provider;
pub mod providers;
pub mod repository;
pub mod template;
pub mod types;

pub use identifier::{repo_id, subject_repo};
pub use types::{Article, Envelope, IngestConfig, IngestResult, Transport};

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::error::IngestError;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_runs_total", "Ingest runs started.");
        describe_counter!("ingest_errors_total", "Ingest runs that failed, by stage.");
        describe_counter!(
            "ingest_articles_total",
            "Articles decoded from provider responses."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider transport errors."
        );
        describe_histogram!("ingest_fetch_ms", "Provider fetch time in milliseconds.");
    });
}

/// Run one ingest: build the URL, fetch, decode, persist, report.
///
/// Stages run in order and the first failure ends the run. Nothing is written
/// unless the envelope decoded. The file is written even when the provider
/// status is not "success".
pub async fn run(config: IngestConfig) -> Result<IngestResult, IngestError> {
    ensure_metrics_described();
    counter!("ingest_runs_total").increment(1);

    match run_stages(&config).await {
        Ok(result) => {
            tracing::info!(
                id = %result.id,
                subject = %result.subject,
                ingested = result.ingested,
                total = result.total,
                "ingest finished"
            );
            Ok(result)
        }
        Err(e) => {
            counter!("ingest_errors_total", "stage" => e.stage()).increment(1);
            tracing::warn!(subject = %config.subject, stage = e.stage(), error = %e, "ingest failed");
            Err(e)
        }
    }
}

async fn run_stages(config: &IngestConfig) -> Result<IngestResult, IngestError> {
    let target = template::render_url(&config.provider_url, &config.key, &config.subject)?;

    let envelope = provider::fetch_envelope(config.transport.as_ref(), &target).await?;

    let id = repo_id(&config.subject);
    let path = subject_repo(&config.storage_path, &config.subject);
    repository::write_articles(&path, &envelope.articles).await?;

    Ok(IngestResult {
        id,
        subject: config.subject.clone(),
        ingested: envelope.is_success(),
        total: envelope.total(),
    })
}
