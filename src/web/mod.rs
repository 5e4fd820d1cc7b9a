// Web server — Axum-based JSON API in front of the classifier.
//
// Routes:
//   POST /detect_fraud — score one transaction amount
//   GET  /health       — liveness + which classifier is loaded
//
// The classifier is constructed before the listener binds and injected
// through AppState; handlers never touch globals.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::classifier::Classifier;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(classifier: Arc<dyn Classifier>, port: u16, bind: &str) -> Result<()> {
    let app = build_router(AppState::new(classifier));

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Fraud scoring service listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/detect_fraud", post(handlers::detect::detect_fraud))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check — always 200 once the server is up, since the classifier
/// loads before the listener binds.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "status": "ok",
            "classifier": state.classifier.describe(),
        })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
