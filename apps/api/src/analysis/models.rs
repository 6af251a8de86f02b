use serde::{Deserialize, Serialize};

/// Highest match score the model may report.
pub const MAX_MATCH_SCORE: u32 = 100;

/// One before/after rewrite suggested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    /// Resume section, e.g. "Professional Summary" or "Experience".
    pub section: String,
    pub original: String,
    pub improved: String,
    pub reason: String,
}

/// Structured feedback for one resume/job-description pair.
///
/// Field names mirror the response schema sent to the model, so the parsed
/// JSON maps onto this struct with no transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub match_score: u32,
    pub summary: String,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggested_improvements: Vec<ImprovementSuggestion>,
}

impl OptimizationResult {
    /// Checks the value constraints the schema alone cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.match_score > MAX_MATCH_SCORE {
            return Err(format!(
                "matchScore must be between 0 and {MAX_MATCH_SCORE}, got {}",
                self.match_score
            ));
        }

        for (index, suggestion) in self.suggested_improvements.iter().enumerate() {
            let fields = [
                ("section", &suggestion.section),
                ("original", &suggestion.original),
                ("improved", &suggestion.improved),
                ("reason", &suggestion.reason),
            ];
            if let Some((name, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
                return Err(format!("suggestedImprovements[{index}].{name} is empty"));
            }
        }

        Ok(())
    }
}
