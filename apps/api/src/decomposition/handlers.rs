//! Axum route handlers for the Decomposition API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DecomposeRequest {
    pub instruction: String,
}

#[derive(Debug, Serialize)]
pub struct DecomposeResponse {
    pub steps: Vec<String>,
    pub prompt: String,
}

/// POST /api/v1/decompose
///
/// Returns the rendered micro-instructions and the full decomposed prompt.
pub async fn handle_decompose(
    State(state): State<AppState>,
    Json(request): Json<DecomposeRequest>,
) -> Result<Json<DecomposeResponse>, AppError> {
    if request.instruction.trim().is_empty() {
        return Err(AppError::Validation(
            "instruction cannot be empty".to_string(),
        ));
    }

    let steps = state.decomposer.decompose(&request.instruction);
    let prompt = state
        .decomposer
        .create_decomposed_prompt(&request.instruction);

    Ok(Json(DecomposeResponse { steps, prompt }))
}
