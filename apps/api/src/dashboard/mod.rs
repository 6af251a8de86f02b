//! Dashboard presentation. Turns an `OptimizationResult` into what the page shows.
//!
//! Only two rules live here: the score color tier and the top-3 truncation
//! of strengths and weaknesses. Everything else is passed through as-is.

use crate::analysis::models::{ImprovementSuggestion, OptimizationResult};

pub mod page;

/// Strengths and weaknesses shown on the summary card.
pub const PREVIEW_LIMIT: usize = 3;

const MEDIUM_THRESHOLD: u32 = 50;
const HIGH_THRESHOLD: u32 = 75;

const GAUGE_RADIUS: f64 = 70.0;

/// Color tier of the match score gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Low,
    Medium,
    High,
}

impl ScoreTier {
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_THRESHOLD {
            ScoreTier::High
        } else if score >= MEDIUM_THRESHOLD {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreTier::Low => "#ef4444",
            ScoreTier::Medium => "#eab308",
            ScoreTier::High => "#22c55e",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreTier::Low => "low",
            ScoreTier::Medium => "medium",
            ScoreTier::High => "high",
        }
    }
}

/// Circular gauge geometry for an SVG ring of radius `GAUGE_RADIUS`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGauge {
    pub score: u32,
    pub tier: ScoreTier,
    pub radius: f64,
    /// Length of the colored arc.
    pub arc: String,
    /// Remainder of the circumference.
    pub gap: String,
}

impl ScoreGauge {
    pub fn new(score: u32) -> Self {
        let circumference = 2.0 * std::f64::consts::PI * GAUGE_RADIUS;
        let filled = circumference * f64::from(score.min(100)) / 100.0;
        Self {
            score,
            tier: ScoreTier::from_score(score),
            radius: GAUGE_RADIUS,
            arc: format!("{filled:.2}"),
            gap: format!("{:.2}", circumference - filled),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub gauge: ScoreGauge,
    pub summary: String,
    pub top_strengths: Vec<String>,
    pub top_weaknesses: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<ImprovementSuggestion>,
}

impl DashboardView {
    pub fn from_result(result: &OptimizationResult) -> Self {
        Self {
            gauge: ScoreGauge::new(result.match_score),
            summary: result.summary.clone(),
            top_strengths: preview(&result.strengths),
            top_weaknesses: preview(&result.weaknesses),
            missing_keywords: result.missing_keywords.clone(),
            suggestions: result.suggested_improvements.clone(),
        }
    }
}

fn preview(items: &[String]) -> Vec<String> {
    items.iter().take(PREVIEW_LIMIT).cloned().collect()
}
