//! The single in-memory page session: the two input texts and the analysis
//! state machine.
//!
//! ```text
//! idle ──submit──▶ analyzing ──ok──▶ complete
//!  ▲                   │
//!  │                   └──err──▶ error
//!  └──────clear─── complete / error / idle
//! ```
//!
//! Clear and a second submit are refused while an analysis is in flight.

use serde::Serialize;
use thiserror::Error;

use crate::analysis::analyzer::inputs_present;
use crate::analysis::models::OptimizationResult;

pub mod handlers;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Analyzing,
    Complete,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisState {
    pub status: AnalysisStatus,
    pub result: Option<OptimizationResult>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("An analysis is already in progress.")]
    AnalysisInFlight,

    #[error("Both resume and job description are required.")]
    MissingInput,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub resume_text: String,
    pub job_description: String,
    pub analysis: AnalysisState,
    /// Last file-upload failure, shown inline until the next upload or clear.
    pub notice: Option<String>,
}

impl Workspace {
    pub fn is_analyzing(&self) -> bool {
        self.analysis.status == AnalysisStatus::Analyzing
    }

    /// Stores the submitted texts and moves to `analyzing`. Returns the texts
    /// to analyze. Blank input leaves the state untouched apart from the texts.
    pub fn submit(
        &mut self,
        resume_text: String,
        job_description: String,
    ) -> Result<(String, String), TransitionError> {
        if self.is_analyzing() {
            return Err(TransitionError::AnalysisInFlight);
        }

        self.resume_text = resume_text;
        self.job_description = job_description;
        if !inputs_present(&self.resume_text, &self.job_description) {
            return Err(TransitionError::MissingInput);
        }

        // The previous result is kept but not shown until the next completion.
        self.analysis.status = AnalysisStatus::Analyzing;
        self.analysis.error = None;
        Ok((self.resume_text.clone(), self.job_description.clone()))
    }

    /// Records the outcome of the in-flight analysis. Ignored when nothing is in flight.
    pub fn finish(&mut self, outcome: Result<OptimizationResult, String>) {
        if !self.is_analyzing() {
            return;
        }

        match outcome {
            Ok(result) => {
                self.analysis = AnalysisState {
                    status: AnalysisStatus::Complete,
                    result: Some(result),
                    error: None,
                };
            }
            Err(message) => {
                self.analysis.status = AnalysisStatus::Error;
                self.analysis.error = Some(message);
            }
        }
    }

    /// Resets texts and analysis state to their initial values.
    pub fn clear(&mut self) -> Result<(), TransitionError> {
        if self.is_analyzing() {
            return Err(TransitionError::AnalysisInFlight);
        }
        *self = Workspace::default();
        Ok(())
    }

    /// Replaces the resume text with freshly extracted file content.
    pub fn load_resume(&mut self, text: String) {
        self.resume_text = text;
        self.notice = None;
    }

    /// Keeps text typed into the page but not yet submitted. Fields the
    /// browser did not send are left as they are.
    pub fn keep_drafts(&mut self, resume_text: Option<String>, job_description: Option<String>) {
        if let Some(text) = resume_text {
            self.resume_text = text;
        }
        if let Some(text) = job_description {
            self.job_description = text;
        }
    }

    pub fn set_notice(&mut self, message: String) {
        self.notice = Some(message);
    }

    /// The result to display, present only in `complete`.
    pub fn visible_result(&self) -> Option<&OptimizationResult> {
        match self.analysis.status {
            AnalysisStatus::Complete => self.analysis.result.as_ref(),
            _ => None,
        }
    }

    /// The banner message, present only in `error`.
    pub fn visible_error(&self) -> Option<&str> {
        match self.analysis.status {
            AnalysisStatus::Error => self.analysis.error.as_deref(),
            _ => None,
        }
    }
}
