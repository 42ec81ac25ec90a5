//! API request handlers
//!
//! Thin glue over the engine crates: every handler takes already-resolved
//! facts from the caller, runs the pure engine, and returns the structured
//! result. Expected failures (validation, hard blocks, missing terms) come
//! back as HTTP 200 with `success: false` so callers can inspect them.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use dealdesk_core::{EvaluationInput, RenderInput};
use dealdesk_renderer::render_package;
use dealdesk_rules::evaluate_rules;
use std::sync::Arc;

use crate::{ApiError, AppState};

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dealdesk"
    }))
}

/// Summarize the loaded rule pack for audit visibility.
pub async fn get_pack(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pack = &state.pack;
    Json(serde_json::json!({
        "version": pack.version,
        "governing_law_policy": pack.governing_law_policy,
        "states_with_net_policy": pack.net_policy_by_state.len(),
        "hard_blocks": pack.hard_blocks.len(),
        "overlay_zip_entries": pack.city_overlay_map.len(),
        "clauses": pack.clause_bank.len(),
        "deep_dive_modules": pack.deep_dive_modules.len(),
    }))
}

/// List all clause ids in the bank.
pub async fn list_clauses(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ids: Vec<String> = state.pack.clause_bank.keys().cloned().collect();
    Json(ids)
}

/// Get one clause by id.
pub async fn get_clause(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.pack.clause_bank.get(&id) {
        Some(clause) => Ok(Json(clause.clone())),
        None => Err(ApiError::NotFound(format!("Clause {} not found", id))),
    }
}

/// Evaluate the applicable legal rules for a deal.
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EvaluationInput>,
) -> impl IntoResponse {
    let result = evaluate_rules(&input, &state.pack);

    tracing::info!(
        state = %input.governing_state,
        success = result.success,
        rule_id = ?result.rule_id,
        "Evaluated deal"
    );

    Json(result)
}

/// Render the full contract package for a deal.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RenderInput>,
) -> impl IntoResponse {
    let result = render_package(&input, &state.pack);

    tracing::info!(
        package_id = %result.package_id,
        success = result.success,
        "Rendered contract package"
    );

    Json(result)
}
