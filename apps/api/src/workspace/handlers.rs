//! Axum route handlers for the browser page. Every form action redirects
//! back to `/`, which renders the current workspace.

use axum::{
    extract::{Multipart, State},
    response::{Html, Redirect},
    Form, Json,
};
use serde::Deserialize;

use crate::analysis::analyzer::analyze_resume;
use crate::dashboard::page::render_page;
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::extract::upload::read_upload_form;
use crate::state::AppState;
use crate::workspace::{TransitionError, Workspace};

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::AnalysisInFlight => AppError::Conflict(e.to_string()),
            TransitionError::MissingInput => AppError::Validation(e.to_string()),
        }
    }
}

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let workspace = state.workspace.lock().await;
    Ok(Html(render_page(&workspace)?))
}

/// POST /analyze
///
/// Starts an analysis in the background and redirects to the page, which
/// shows the analyzing state until the task finishes. Blank input is a no-op.
pub async fn handle_submit(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeForm>,
) -> Result<Redirect, AppError> {
    let submitted = state
        .workspace
        .lock()
        .await
        .submit(form.resume_text, form.job_description);

    let (resume_text, job_description) = match submitted {
        Ok(inputs) => inputs,
        Err(TransitionError::MissingInput) => return Ok(Redirect::to("/")),
        Err(e) => return Err(e.into()),
    };

    // Detached so a dropped browser connection cannot strand the workspace in `analyzing`.
    tokio::spawn(run_analysis(state, resume_text, job_description));

    Ok(Redirect::to("/"))
}

async fn run_analysis(state: AppState, resume_text: String, job_description: String) {
    let outcome = analyze_resume(state.llm.as_ref(), &resume_text, &job_description)
        .await
        .map_err(|e| e.to_string());

    state.workspace.lock().await.finish(outcome);
}

/// POST /upload
///
/// Extracts the uploaded file into the resume text. The job description
/// typed on the page is kept. Failures become the page notice and leave the
/// typed resume text in place.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let (extracted, resume_draft, job_description) = match read_upload_form(&mut multipart).await {
        Ok(mut form) => {
            let extracted = match form.take_file() {
                Ok(upload) => extract_text(upload).await.map_err(AppError::from),
                Err(e) => Err(e),
            };
            (extracted, form.resume_text, form.job_description)
        }
        Err(e) => (Err(e), None, None),
    };

    let mut workspace = state.workspace.lock().await;
    if workspace.is_analyzing() {
        return Err(TransitionError::AnalysisInFlight.into());
    }

    workspace.keep_drafts(resume_draft, job_description);
    match extracted {
        Ok(text) => workspace.load_resume(text),
        Err(e) => {
            tracing::warn!("Upload rejected: {e}");
            workspace.set_notice(e.to_string());
        }
    }

    Ok(Redirect::to("/"))
}

/// POST /clear
pub async fn handle_clear(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.workspace.lock().await.clear()?;
    Ok(Redirect::to("/"))
}

/// GET /api/v1/workspace
pub async fn handle_get_workspace(State(state): State<AppState>) -> Json<Workspace> {
    Json(state.workspace.lock().await.clone())
}
