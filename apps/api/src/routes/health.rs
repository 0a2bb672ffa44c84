use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and generation mode, so
/// callers can tell a degraded deployment from a live one.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "reviewer-api",
        "model": state.config.groq_model,
        "degraded": state.config.groq_api_key.is_none(),
    }))
}
