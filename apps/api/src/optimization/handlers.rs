//! Axum route handlers for the Optimization API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::history::Recorded;
use crate::optimization::optimizer::{
    OptimizationResult, OptimizeOptions, DEFAULT_MAX_ITERATIONS, DEFAULT_TARGET_IMPROVEMENT,
};
use crate::rules::TaskType;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub prompt: String,
    /// Unknown task types are treated as "general".
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub target_improvement: Option<f64>,
    #[serde(default)]
    pub max_iterations: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct OptimizationHistoryResponse {
    pub total: usize,
    pub entries: Vec<Recorded<OptimizationResult>>,
}

/// POST /api/v1/optimize
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizationResult>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let max_iterations = request.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
    if max_iterations > state.config.max_iterations_limit {
        return Err(AppError::Validation(format!(
            "max_iterations must be at most {}",
            state.config.max_iterations_limit
        )));
    }

    let target_improvement = request
        .target_improvement
        .unwrap_or(DEFAULT_TARGET_IMPROVEMENT);
    if !(0.0..=1.0).contains(&target_improvement) {
        return Err(AppError::Validation(
            "target_improvement must be between 0 and 1".to_string(),
        ));
    }

    let options = OptimizeOptions {
        task_type: request
            .task_type
            .as_deref()
            .map(TaskType::parse)
            .unwrap_or_default(),
        target_improvement,
        max_iterations,
    };

    let result = state.lock_optimizer()?.optimize(&request.prompt, &options);
    Ok(Json(result))
}

/// GET /api/v1/optimize/history
pub async fn handle_optimization_history(
    State(state): State<AppState>,
) -> Result<Json<OptimizationHistoryResponse>, AppError> {
    let optimizer = state.lock_optimizer()?;
    let history = optimizer.history();
    Ok(Json(OptimizationHistoryResponse {
        total: history.len(),
        entries: history.entries().to_vec(),
    }))
}
