//! Axum route handlers for the Evaluation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::evaluation::evaluator::EvaluationResult;
use crate::history::Recorded;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub prompt: String,
    pub response: String,
    #[serde(default)]
    pub ground_truth: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub prompts: Vec<String>,
    pub responses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub results: Vec<EvaluationResult>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationHistoryResponse {
    pub total: usize,
    pub entries: Vec<Recorded<EvaluationResult>>,
}

/// POST /api/v1/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResult>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }
    if request.response.trim().is_empty() {
        return Err(AppError::Validation("response cannot be empty".to_string()));
    }

    let result = state.lock_evaluator()?.evaluate(
        &request.prompt,
        &request.response,
        request.ground_truth.as_deref(),
    );
    Ok(Json(result))
}

/// POST /api/v1/evaluate/compare
///
/// Pairs prompts with responses by position; extra items on the longer side are ignored.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    if request.prompts.is_empty() {
        return Err(AppError::Validation("prompts cannot be empty".to_string()));
    }

    let results = state
        .lock_evaluator()?
        .compare_prompts(&request.prompts, &request.responses);
    Ok(Json(CompareResponse { results }))
}

/// GET /api/v1/evaluate/history
pub async fn handle_evaluation_history(
    State(state): State<AppState>,
) -> Result<Json<EvaluationHistoryResponse>, AppError> {
    let evaluator = state.lock_evaluator()?;
    let history = evaluator.history();
    Ok(Json(EvaluationHistoryResponse {
        total: history.len(),
        entries: history.entries().to_vec(),
    }))
}
