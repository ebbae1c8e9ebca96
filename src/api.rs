use std::future::{Future, IntoFuture};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::ingest::{self, IngestConfig, Transport};

pub const INGEST_ROUTE: &str = "/api/v0.1/ingest";

/// Upper bound for one request, provider fetch included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// How long in-flight requests may keep running after a shutdown signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct AppState {
    pub provider_key: String,
    pub data_endpoint: String,
    pub ingest_dir: PathBuf,
    pub transport: Arc<dyn Transport>,
}

impl AppState {
    pub fn new(cfg: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            provider_key: cfg.provider_key.clone(),
            data_endpoint: cfg.data_endpoint.clone(),
            ingest_dir: cfg.ingest_dir.clone(),
            transport,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(INGEST_ROUTE, post(ingest_subject))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Serve `app` until `shutdown` resolves, then drain for at most `grace`.
///
/// Requests still running when the grace period ends are dropped.
pub async fn serve<S>(
    listener: TcpListener,
    app: Router,
    shutdown: S,
    grace: Duration,
) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let deadline = async move {
        match signalled_rx.await {
            Ok(()) => tokio::time::sleep(grace).await,
            // server finished on its own
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        res = server => res,
        _ = deadline => {
            tracing::warn!(grace_secs = grace.as_secs_f64(), "shutdown grace period elapsed, dropping open requests");
            Ok(())
        }
    }
}

#[derive(serde::Serialize)]
struct HealthResp {
    alive: bool,
}

async fn health() -> Json<HealthResp> {
    Json(HealthResp { alive: true })
}

#[derive(serde::Deserialize)]
struct IngestReq {
    subject: String,
}

async fn ingest_subject(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !is_json(&headers) {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }

    let req: IngestReq = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(route = INGEST_ROUTE, error = %e, "bad ingest payload");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    tracing::info!(route = INGEST_ROUTE, subject = %req.subject, "ingest request received");

    let cfg = IngestConfig::new(
        state.provider_key,
        req.subject,
        state.ingest_dir,
        state.data_endpoint,
        state.transport,
    );

    match ingest::run(cfg).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            // details stay in the log; the client only sees the status
            tracing::error!(route = INGEST_ROUTE, stage = e.stage(), error = %e, "ingest failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}
