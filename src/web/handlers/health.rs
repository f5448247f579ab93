//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::web::state::SharedState;

pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let schema_version = state.schema.report().map(|r| r.to_version);
    let body = serde_json::json!({
        "status": "ok",
        "schema_ready": state.schema.is_ready(),
        "schema_version": schema_version,
        "notifications": state.notifier.is_configured(),
    });
    (StatusCode::OK, axum::Json(body))
}
