//! Axum route handlers for the Template and prompt-builder API.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::templates::builders::{chain_of_thought_prompt, few_shot_prompt, FewShotExample};
use crate::templates::PromptTemplate;

#[derive(Debug, Serialize)]
pub struct RegisterTemplateResponse {
    pub name: String,
    pub replaced: bool,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderTemplateRequest {
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ChainOfThoughtRequest {
    pub task: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FewShotRequest {
    pub task: String,
    pub examples: Vec<FewShotExample>,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}

/// POST /api/v1/templates
pub async fn handle_register_template(
    State(state): State<AppState>,
    Json(template): Json<PromptTemplate>,
) -> Result<(StatusCode, Json<RegisterTemplateResponse>), AppError> {
    if template.name.trim().is_empty() {
        return Err(AppError::Validation(
            "template name cannot be empty".to_string(),
        ));
    }

    let name = template.name.clone();
    let replaced = state.write_templates()?.register(template).is_some();

    Ok((
        StatusCode::CREATED,
        Json(RegisterTemplateResponse { name, replaced }),
    ))
}

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<TemplateListResponse>, AppError> {
    let names = state.read_templates()?.names();
    Ok(Json(TemplateListResponse { names }))
}

/// GET /api/v1/templates/:name
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PromptTemplate>, AppError> {
    let template = state
        .read_templates()?
        .get(&name)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Template '{name}' not found")))?;
    Ok(Json(template))
}

/// POST /api/v1/templates/:name/render
pub async fn handle_render_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<RenderTemplateRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    let template = state
        .read_templates()?
        .get(&name)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Template '{name}' not found")))?;

    if !template.validate(&request.variables) {
        let missing: Vec<&str> = template
            .variables
            .iter()
            .filter(|v| !request.variables.contains_key(*v))
            .map(String::as_str)
            .collect();
        return Err(AppError::Validation(format!(
            "missing template variables: {}",
            missing.join(", ")
        )));
    }

    let prompt = template.format(&request.variables)?;
    Ok(Json(PromptResponse { prompt }))
}

/// POST /api/v1/prompts/chain-of-thought
pub async fn handle_chain_of_thought(
    Json(request): Json<ChainOfThoughtRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    if request.task.trim().is_empty() {
        return Err(AppError::Validation("task cannot be empty".to_string()));
    }
    Ok(Json(PromptResponse {
        prompt: chain_of_thought_prompt(&request.task, &request.steps),
    }))
}

/// POST /api/v1/prompts/few-shot
pub async fn handle_few_shot(
    Json(request): Json<FewShotRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    if request.task.trim().is_empty() {
        return Err(AppError::Validation("task cannot be empty".to_string()));
    }
    Ok(Json(PromptResponse {
        prompt: few_shot_prompt(&request.task, &request.examples, &request.query),
    }))
}
