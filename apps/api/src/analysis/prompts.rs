// Prompt constants for resume analysis.

/// System instruction framing the assistant's persona.
pub const ANALYSIS_SYSTEM: &str = "You are a helpful career coach that provides constructive, \
    specific, and encouraging feedback.";

/// Analysis prompt template. Replace `{resume_text}` and `{job_description}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Act as an expert Technical Recruiter and ATS (Applicant Tracking System) specialist.

I will provide you with a Resume and a Job Description (JD).
Your goal is to analyze the resume against the JD and provide actionable feedback to increase the candidate's chances of getting an interview.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

Analyze strict keyword matching, tone, impact, and relevance."#;

/// Renders the analysis prompt. The job description is substituted first so
/// placeholder-looking text inside the resume is never expanded.
pub fn render_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    let (head, tail) = ANALYSIS_PROMPT_TEMPLATE
        .split_once("{resume_text}")
        .unwrap_or((ANALYSIS_PROMPT_TEMPLATE, ""));
    let tail = tail.replace("{job_description}", job_description);
    format!("{head}{resume_text}{tail}")
}
