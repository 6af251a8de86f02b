use askama::Template;
use chrono::{Datelike, Utc};

use crate::dashboard::DashboardView;
use crate::errors::AppError;
use crate::workspace::Workspace;

/// The single page: input panel on the left, dashboard on the right.
#[derive(Template)]
#[template(source = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ResumAI - ATS Resume Optimizer</title>
    {% if analyzing %}<meta http-equiv="refresh" content="2">{% endif %}
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
        header { background: #fff; border-bottom: 1px solid #e2e8f0; padding: 16px 32px; }
        header h1 { margin: 0; font-size: 20px; }
        main { display: grid; grid-template-columns: minmax(320px, 5fr) 7fr; gap: 24px; padding: 24px 32px; }
        .card { background: #fff; border: 1px solid #e2e8f0; border-radius: 12px; padding: 20px; margin-bottom: 16px; }
        textarea { width: 100%; min-height: 220px; box-sizing: border-box; font-family: inherit; padding: 12px; border: 1px solid #cbd5e1; border-radius: 8px; }
        .actions { display: flex; gap: 12px; margin-top: 12px; }
        button { padding: 10px 18px; border-radius: 8px; border: none; cursor: pointer; font-weight: 600; }
        button:disabled { opacity: 0.5; cursor: not-allowed; }
        .primary { background: #4f46e5; color: #fff; flex: 1; }
        .secondary { background: #e2e8f0; color: #334155; }
        .banner { background: #fef2f2; border: 1px solid #fecaca; color: #b91c1c; padding: 12px 16px; border-radius: 8px; margin-bottom: 16px; }
        .notice { background: #fffbeb; border: 1px solid #fde68a; color: #92400e; padding: 10px 14px; border-radius: 8px; margin-top: 12px; }
        .gauge { display: flex; align-items: center; gap: 24px; }
        .gauge-label { font-size: 28px; font-weight: 700; }
        .tier-low { color: #ef4444; }
        .tier-medium { color: #eab308; }
        .tier-high { color: #22c55e; }
        .tag { display: inline-block; background: #fef2f2; color: #b91c1c; border-radius: 999px; padding: 4px 10px; margin: 4px 4px 0 0; font-size: 13px; }
        .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
        .original { background: #f1f5f9; padding: 10px; border-radius: 6px; text-decoration: line-through; color: #64748b; }
        .improved { background: #f0fdf4; padding: 10px; border-radius: 6px; color: #166534; }
        .reason { font-size: 13px; color: #475569; }
        .placeholder { text-align: center; color: #64748b; padding: 64px 16px; }
        footer { text-align: center; color: #94a3b8; font-size: 13px; padding: 24px; }
    </style>
</head>
<body>
    <header><h1>ResumAI</h1></header>
    <main>
        <section>
            <form class="card" method="post" action="/analyze">
                <label for="file"><strong>Resume file</strong></label>
                <input type="file" id="file" name="file" accept=".pdf,.txt,.md" {% if analyzing %}disabled{% endif %}>
                <button class="secondary" type="submit" formaction="/upload" formenctype="multipart/form-data" formnovalidate {% if analyzing %}disabled{% endif %}>Upload</button>
                {% if let Some(message) = notice %}
                <div class="notice">{{ message }}</div>
                {% endif %}

                <label for="resume_text"><strong>Resume text</strong></label>
                <textarea id="resume_text" name="resume_text" required placeholder="Paste your resume here...">{{ resume_text }}</textarea>

                <label for="job_description"><strong>Job description</strong></label>
                <textarea id="job_description" name="job_description" required placeholder="Paste the job description here...">{{ job_description }}</textarea>

                <div class="actions">
                    <button class="secondary" type="submit" formaction="/clear" formnovalidate {% if analyzing %}disabled{% endif %}>Clear</button>
                    <button class="primary" type="submit" {% if analyzing %}disabled{% endif %}>
                        {% if analyzing %}Analyzing...{% else %}Optimize Resume{% endif %}
                    </button>
                </div>
            </form>
        </section>

        <section>
            {% if let Some(message) = error %}
            <div class="banner">{{ message }}</div>
            {% endif %}

            {% if let Some(view) = dashboard %}
            <div class="card gauge">
                <svg width="160" height="160" viewBox="0 0 160 160">
                    <circle cx="80" cy="80" r="{{ view.gauge.radius }}" fill="none" stroke="#e2e8f0" stroke-width="12"></circle>
                    <circle cx="80" cy="80" r="{{ view.gauge.radius }}" fill="none" stroke="{{ view.gauge.tier.color() }}" stroke-width="12"
                        stroke-linecap="round" stroke-dasharray="{{ view.gauge.arc }} {{ view.gauge.gap }}" transform="rotate(-90 80 80)"></circle>
                </svg>
                <div>
                    <div class="gauge-label tier-{{ view.gauge.tier.css_class() }}">{{ view.gauge.score }}%</div>
                    <div>ATS Match Score</div>
                </div>
            </div>

            <div class="card">
                <h3>Summary</h3>
                <p>{{ view.summary }}</p>
                <div class="columns">
                    <div>
                        <h4>Strengths</h4>
                        <ul>
                        {% for item in view.top_strengths %}
                            <li>{{ item }}</li>
                        {% endfor %}
                        </ul>
                    </div>
                    <div>
                        <h4>Weaknesses</h4>
                        <ul>
                        {% for item in view.top_weaknesses %}
                            <li>{{ item }}</li>
                        {% endfor %}
                        </ul>
                    </div>
                </div>
            </div>

            <div class="card">
                <h3>Missing Keywords</h3>
                {% if view.missing_keywords.is_empty() %}
                <p>Great job! No major keywords missing.</p>
                {% else %}
                {% for keyword in view.missing_keywords %}<span class="tag">{{ keyword }}</span>{% endfor %}
                {% endif %}
            </div>

            <div class="card">
                <h3>Suggested Improvements ({{ view.suggestions.len() }})</h3>
                {% for suggestion in view.suggestions %}
                <div class="card">
                    <h4>{{ suggestion.section }}</h4>
                    <div class="columns">
                        <div>
                            <div><strong>Original</strong></div>
                            <div class="original">{{ suggestion.original }}</div>
                        </div>
                        <div>
                            <div><strong>Suggested Rewrite</strong></div>
                            <div class="improved">{{ suggestion.improved }}</div>
                        </div>
                    </div>
                    <p class="reason"><strong>Why:</strong> {{ suggestion.reason }}</p>
                </div>
                {% endfor %}
            </div>
            {% else %}
            <div class="card placeholder">
                {% if analyzing %}
                <h3>Analyzing your resume...</h3>
                <p>Comparing your experience against the job requirements.</p>
                {% else %}
                <h3>Ready to optimize</h3>
                <p>Paste your resume and the job description, then press Optimize Resume.</p>
                {% endif %}
            </div>
            {% endif %}
        </section>
    </main>
    <footer>&copy; {{ year }} ResumAI</footer>
</body>
</html>"##, ext = "html")]
pub struct IndexTemplate {
    pub resume_text: String,
    pub job_description: String,
    pub analyzing: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub dashboard: Option<DashboardView>,
    pub year: i32,
}

impl IndexTemplate {
    pub fn from_workspace(workspace: &Workspace) -> Self {
        Self {
            resume_text: workspace.resume_text.clone(),
            job_description: workspace.job_description.clone(),
            analyzing: workspace.is_analyzing(),
            notice: workspace.notice.clone(),
            error: workspace.visible_error().map(String::from),
            dashboard: workspace.visible_result().map(DashboardView::from_result),
            year: Utc::now().year(),
        }
    }
}

/// Renders the page for the current workspace snapshot.
pub fn render_page(workspace: &Workspace) -> Result<String, AppError> {
    Ok(IndexTemplate::from_workspace(workspace).render()?)
}
