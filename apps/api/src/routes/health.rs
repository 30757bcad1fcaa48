use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus a summary of the loaded rule tables.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "microprompt-api",
        "rules": {
            "decomposition_patterns": state.rules.catalog.patterns.len(),
            "format_indicators": state.rules.format_indicators.len(),
        }
    }))
}
