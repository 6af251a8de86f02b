//! Resume analysis: one schema-constrained completion per request.
//!
//! Flow: validate inputs → render prompt → complete → parse JSON →
//!       check against schema → deserialize → value checks.
//!
//! All-or-nothing: any failure returns an `AnalysisError`, never a partial result.

use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::models::OptimizationResult;
use crate::analysis::prompts::{render_analysis_prompt, ANALYSIS_SYSTEM};
use crate::analysis::schema::optimization_result_schema;
use crate::llm_client::{
    strip_json_fences, CompletionRequest, CompletionService, LlmError, ResponseSchema,
};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Both resume and job description are required.")]
    MissingInput,

    #[error(transparent)]
    Service(#[from] LlmError),

    #[error("The analysis response was not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("The analysis response did not match the expected format: {0}")]
    InvalidShape(String),
}

impl AnalysisError {
    /// True when the request never left the process.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AnalysisError::MissingInput)
    }
}

/// True when both texts contain something other than whitespace.
pub fn inputs_present(resume_text: &str, job_description: &str) -> bool {
    !resume_text.trim().is_empty() && !job_description.trim().is_empty()
}

/// Sends the resume and job description to the completion service and
/// returns the validated structured feedback.
pub async fn analyze_resume(
    llm: &dyn CompletionService,
    resume_text: &str,
    job_description: &str,
) -> Result<OptimizationResult, AnalysisError> {
    if !inputs_present(resume_text, job_description) {
        return Err(AnalysisError::MissingInput);
    }

    let analysis_id = Uuid::new_v4();
    let started = Instant::now();
    info!(
        %analysis_id,
        model = llm.model(),
        resume_chars = resume_text.chars().count(),
        job_description_chars = job_description.chars().count(),
        "Starting resume analysis"
    );

    let prompt = render_analysis_prompt(resume_text, job_description);
    let schema = optimization_result_schema();

    let outcome = request_analysis(llm, &prompt, &schema).await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        Ok(result) => info!(
            %analysis_id,
            match_score = result.match_score,
            suggestions = result.suggested_improvements.len(),
            elapsed_ms,
            "Resume analysis complete"
        ),
        Err(e) => warn!(%analysis_id, elapsed_ms, "Resume analysis failed: {e}"),
    }

    outcome
}

async fn request_analysis(
    llm: &dyn CompletionService,
    prompt: &str,
    schema: &ResponseSchema,
) -> Result<OptimizationResult, AnalysisError> {
    let text = llm
        .complete(CompletionRequest {
            prompt,
            system_instruction: ANALYSIS_SYSTEM,
            response_schema: schema,
        })
        .await?;
    parse_result(&text, schema)
}

/// Parses model output into an `OptimizationResult`, checking it against
/// the schema it was requested with before trusting it.
fn parse_result(text: &str, schema: &ResponseSchema) -> Result<OptimizationResult, AnalysisError> {
    let value: serde_json::Value = serde_json::from_str(strip_json_fences(text))?;

    schema
        .validate(&value)
        .map_err(|violation| AnalysisError::InvalidShape(violation.to_string()))?;

    let result: OptimizationResult = serde_json::from_value(value)
        .map_err(|e| AnalysisError::InvalidShape(e.to_string()))?;

    result.validate().map_err(AnalysisError::InvalidShape)?;

    Ok(result)
}
