// tests/provider_http.rs
//
// Runs the reqwest-backed transport against a throwaway Axum server on
// 127.0.0.1:0, standing in for the news provider.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::OriginalUri,
    http::{Method, StatusCode},
    routing::any,
    Router,
};
use tokio::net::TcpListener;

use rounder::error::IngestError;
use rounder::ingest::providers::HttpTransport;
use rounder::ingest::{self, subject_repo, IngestConfig};

const RAW_OK: &str = include_str!("fixtures/ingestion-raw-success.json");

type Seen = Arc<Mutex<Vec<(Method, String)>>>;

/// Serve `body` with `status` for every request; record method + path/query.
async fn spawn_provider(status: StatusCode, body: &'static str) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(vec![]));
    let rec = seen.clone();

    let app = Router::new().route(
        "/{*path}",
        any(move |method: Method, OriginalUri(uri): OriginalUri| {
            let rec = rec.clone();
            async move {
                rec.lock().unwrap().push((method, uri.to_string()));
                (status, body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), seen)
}

#[tokio::test]
async fn issues_get_with_substituted_query() {
    let (base, seen) = spawn_provider(StatusCode::OK, RAW_OK).await;
    let dir = tempfile::tempdir().unwrap();

    let pattern = format!(
        "{base}/api/v1/search?key=_KEY_&query=_SUBJECT_%20AND%20sourceCountry:%22United%20Kingdom%22&limit=100&format=json"
    );
    let cfg = IngestConfig::new(
        "api-key",
        "off-payroll",
        dir.path(),
        pattern,
        Arc::new(HttpTransport::new()),
    );

    let result = ingest::run(cfg).await.expect("ingest ok");
    assert_eq!(result.to_string(), "ingestion_off_payroll::off-payroll::true::1");
    assert!(subject_repo(dir.path(), "off-payroll").exists());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, Method::GET);
    assert_eq!(
        seen[0].1,
        "/api/v1/search?key=api-key&query=off-payroll%20AND%20sourceCountry:%22United%20Kingdom%22&limit=100&format=json"
    );
}

#[tokio::test]
async fn error_status_with_json_body_is_still_decoded() {
    let (base, _seen) = spawn_provider(
        StatusCode::BAD_GATEWAY,
        r#"{"status":"error","totalResults":"0","articles":[]}"#,
    )
    .await;
    let dir = tempfile::tempdir().unwrap();

    let cfg = IngestConfig::new(
        "k",
        "tax",
        dir.path(),
        format!("{base}/search?key=_KEY_&q=_SUBJECT_"),
        Arc::new(HttpTransport::new()),
    );
    let result = ingest::run(cfg).await.unwrap();
    assert!(!result.ingested);
    assert!(subject_repo(dir.path(), "tax").exists());
}

#[tokio::test]
async fn error_status_with_html_body_is_a_decode_error() {
    let (base, _seen) =
        spawn_provider(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").await;
    let dir = tempfile::tempdir().unwrap();

    let cfg = IngestConfig::new(
        "k",
        "tax",
        dir.path(),
        format!("{base}/search?key=_KEY_&q=_SUBJECT_"),
        Arc::new(HttpTransport::new()),
    );
    let err = ingest::run(cfg).await.unwrap_err();
    assert!(matches!(err, IngestError::Decode(_)), "got {err:?}");
    assert!(!subject_repo(dir.path(), "tax").exists());
}

#[tokio::test]
async fn connection_refused_is_a_fetch_error() {
    // Grab a free port, then close it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let transport = HttpTransport::with_timeout(Duration::from_secs(5)).unwrap();
    let cfg = IngestConfig::new(
        "k",
        "off-payroll",
        dir.path(),
        format!("http://{addr}/search?key=_KEY_&q=_SUBJECT_"),
        Arc::new(transport),
    );

    let err = ingest::run(cfg).await.unwrap_err();
    assert!(matches!(err, IngestError::Fetch(_)), "got {err:?}");
    assert!(!subject_repo(dir.path(), "off-payroll").exists());
}
