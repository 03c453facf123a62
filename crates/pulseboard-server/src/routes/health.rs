use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// `GET /health`: liveness check.
///
/// Always `200 OK` while the process is serving. `analytics` reports whether
/// service-account credentials are present, without contacting Google.
///
/// Response shape:
/// ```json
/// { "status": "ok", "version": "0.1.0", "analytics": "configured" }
/// ```
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let analytics = match state.config.google.require() {
        Ok(_) => "configured",
        Err(_) => "unconfigured",
    };
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "analytics": analytics,
        })),
    )
}
