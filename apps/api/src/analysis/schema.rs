//! The structured-output contract for resume analysis.

use crate::llm_client::ResponseSchema;

/// Builds the schema sent as `responseSchema`. Field names and types match
/// `OptimizationResult` exactly; every field is required.
pub fn optimization_result_schema() -> ResponseSchema {
    let suggestion = ResponseSchema::object()
        .property(
            "section",
            ResponseSchema::string()
                .describe("The section of the resume (e.g., Professional Summary, Experience)."),
        )
        .property(
            "original",
            ResponseSchema::string()
                .describe("A brief snippet or description of the current content."),
        )
        .property(
            "improved",
            ResponseSchema::string()
                .describe("A rewritten version or specific actionable advice."),
        )
        .property(
            "reason",
            ResponseSchema::string().describe("Why this change is recommended."),
        );

    ResponseSchema::object()
        .property(
            "matchScore",
            ResponseSchema::integer().describe(
                "A score from 0 to 100 indicating how well the resume matches the job description.",
            ),
        )
        .property(
            "summary",
            ResponseSchema::string().describe("A brief executive summary of the analysis."),
        )
        .property(
            "missingKeywords",
            ResponseSchema::array(ResponseSchema::string()).describe(
                "List of critical keywords or skills found in the JD but missing from the resume.",
            ),
        )
        .property(
            "strengths",
            ResponseSchema::array(ResponseSchema::string())
                .describe("List of strong points in the resume."),
        )
        .property(
            "weaknesses",
            ResponseSchema::array(ResponseSchema::string())
                .describe("List of weak points or gaps in the resume."),
        )
        .property(
            "suggestedImprovements",
            ResponseSchema::array(suggestion)
                .describe("Specific actionable suggestions to improve the resume."),
        )
}
