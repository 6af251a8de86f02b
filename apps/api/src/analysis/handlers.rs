//! Axum route handlers for the stateless Analysis API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::analyzer::analyze_resume;
use crate::analysis::models::OptimizationResult;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

/// POST /api/v1/analyze
///
/// Runs one analysis without touching the page workspace.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<OptimizationResult>, AppError> {
    let result = analyze_resume(
        state.llm.as_ref(),
        &request.resume_text,
        &request.job_description,
    )
    .await?;

    Ok(Json(result))
}
