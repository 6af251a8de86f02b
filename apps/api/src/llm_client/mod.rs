/// LLM Client: the single point of entry for all Gemini API calls in ResumAI.
///
/// No other module may call the Gemini API directly. Callers depend on the
/// `CompletionService` trait; `main` constructs the concrete `GeminiClient`
/// and hands it to `AppState`, tests hand in a fake.
///
/// One request per call. There is no retry loop and no client-side timeout;
/// failures go straight back to the caller.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod schema;

#[cfg(test)]
pub mod fake;

pub use schema::ResponseSchema;

const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error while contacting Gemini: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gemini API key is not configured. Set GEMINI_API_KEY and try again.")]
    MissingApiKey,

    #[error("Gemini declined to answer this request ({reason}).")]
    Blocked { reason: String },

    #[error("No response received from Gemini.")]
    EmptyContent,
}

/// Everything one schema-constrained completion needs.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub system_instruction: &'a str,
    pub response_schema: &'a ResponseSchema,
}

/// A completion backend that answers with JSON text conforming to the
/// request's schema. Carried in `AppState` as `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the raw response text. Empty output is an error, never `Ok("")`.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError>;

    /// Model identifier, for logs and the health endpoint.
    fn model(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a ResponseSchema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    /// Thinking models may return reasoning parts; they are never answer text.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the answer text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        Some(text)
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client with structured-output support.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .user_agent(concat!("resumai/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            api_base: config.gemini_api_base.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_schema: request.response_schema,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Gemini wraps errors as {"error": {"code", "message", "status"}}
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &payload.usage_metadata {
            debug!(
                "Gemini call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                self.model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        match payload.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => {
                warn!(
                    "Gemini returned no text: finish_reason={:?}, block_reason={:?}",
                    payload.finish_reason(),
                    payload.block_reason()
                );
                match payload.block_reason() {
                    Some(reason) => Err(LlmError::Blocked {
                        reason: reason.to_string(),
                    }),
                    None => Err(LlmError::EmptyContent),
                }
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured {
        key: Arc<Mutex<Option<String>>>,
        body: Arc<Mutex<Option<Value>>>,
    }

    /// Serves a single canned Gemini reply on a random local port.
    async fn spawn_gemini(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/v1beta/models/:model",
                post(
                    move |State(captured): State<Captured>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *captured.key.lock().unwrap() = headers
                                .get("x-goog-api-key")
                                .and_then(|v| v.to_str().ok())
                                .map(String::from);
                            *captured.body.lock().unwrap() = Some(body);
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1beta"), captured)
    }

    fn client_for(api_base: &str, api_key: Option<&str>) -> GeminiClient {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.gemini_api_base = api_base.to_string();
        config.gemini_api_key = api_key.map(String::from);
        GeminiClient::new(&config).unwrap()
    }

    fn schema() -> ResponseSchema {
        ResponseSchema::object().property("ok", ResponseSchema::boolean())
    }

    fn request(schema: &ResponseSchema) -> CompletionRequest<'_> {
        CompletionRequest {
            prompt: "Analyze this",
            system_instruction: "Be helpful",
            response_schema: schema,
        }
    }

    #[tokio::test]
    async fn test_sends_structured_request_and_returns_text() {
        let (base, captured) = spawn_gemini(
            StatusCode::OK,
            json!({
                "candidates": [{
                    "content": {"parts": [{"text": "{\"ok\":"}, {"text": "true}"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
            }),
        )
        .await;
        let client = client_for(&base, Some("secret-key"));
        let schema = schema();

        let text = client.complete(request(&schema)).await.unwrap();
        assert_eq!(text, "{\"ok\":true}");

        assert_eq!(captured.key.lock().unwrap().as_deref(), Some("secret-key"));
        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze this");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be helpful");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["properties"]["ok"]["type"],
            "BOOLEAN"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_calling_service() {
        let client = client_for("http://127.0.0.1:9", None);
        let schema = schema();
        let err = client.complete(request(&schema)).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_api_error_message_is_unwrapped() {
        let (base, _) = spawn_gemini(
            StatusCode::BAD_REQUEST,
            json!({"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}),
        )
        .await;
        let client = client_for(&base, Some("bad-key"));
        let schema = schema();

        match client.complete(request(&schema)).await.unwrap_err() {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_candidate_text_is_empty_content() {
        let (base, _) = spawn_gemini(
            StatusCode::OK,
            json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}),
        )
        .await;
        let client = client_for(&base, Some("key"));
        let schema = schema();

        let err = client.complete(request(&schema)).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
        assert_eq!(err.to_string(), "No response received from Gemini.");
    }

    #[tokio::test]
    async fn test_blocked_prompt_names_the_reason() {
        let (base, _) = spawn_gemini(
            StatusCode::OK,
            json!({"promptFeedback": {"blockReason": "SAFETY"}}),
        )
        .await;
        let client = client_for(&base, Some("key"));
        let schema = schema();

        let err = client.complete(request(&schema)).await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_response_text_skips_thought_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"text": "thinking...", "thought": true},
                {"text": "{}"}
            ]}}]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{}"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }
}
