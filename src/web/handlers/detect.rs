// POST /detect_fraud — score a single transaction amount.
//
// Request:  {"amount": <number>}
// Response: 200 {"is_fraud": bool}
//           400 {"error": "Amount is required"}
//           500 {"error": "<underlying failure>"}
//
// The body is taken as raw bytes instead of axum's Json extractor so that
// a missing Content-Type or unparseable JSON still produces the same
// {"error": ...} shape as every other failure.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::detect::{detect, DetectError};
use crate::web::{api_error, AppState};

/// POST /detect_fraud — run the classifier on the request's amount.
pub async fn detect_fraud(State(state): State<AppState>, body: Bytes) -> Response {
    match detect(state.classifier.as_ref(), &body).await {
        Ok(verdict) => Json(verdict).into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &DetectError) -> Response {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    if let DetectError::Classifier(_) = err {
        tracing::error!(error = %err, "Classifier failed");
    }

    api_error(status, &err.to_string())
}
