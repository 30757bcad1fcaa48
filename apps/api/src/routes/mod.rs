pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::decomposition::handlers as decomposition;
use crate::evaluation::handlers as evaluation;
use crate::optimization::handlers as optimization;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Decomposition
        .route("/api/v1/decompose", post(decomposition::handle_decompose))
        // Evaluation
        .route("/api/v1/evaluate", post(evaluation::handle_evaluate))
        .route("/api/v1/evaluate/compare", post(evaluation::handle_compare))
        .route(
            "/api/v1/evaluate/history",
            get(evaluation::handle_evaluation_history),
        )
        // Optimization
        .route("/api/v1/optimize", post(optimization::handle_optimize))
        .route(
            "/api/v1/optimize/history",
            get(optimization::handle_optimization_history),
        )
        // Templates
        .route(
            "/api/v1/templates",
            get(templates::handle_list_templates).post(templates::handle_register_template),
        )
        .route("/api/v1/templates/:name", get(templates::handle_get_template))
        .route(
            "/api/v1/templates/:name/render",
            post(templates::handle_render_template),
        )
        // Prompt builders
        .route(
            "/api/v1/prompts/chain-of-thought",
            post(templates::handle_chain_of_thought),
        )
        .route("/api/v1/prompts/few-shot", post(templates::handle_few_shot))
        .with_state(state)
}
