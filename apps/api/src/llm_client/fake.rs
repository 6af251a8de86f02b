//! In-memory `CompletionService` for tests. Replies are queued up front and
//! every call is recorded so tests can assert on what was sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{CompletionRequest, CompletionService, LlmError};

#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String),
    Empty,
    ApiError { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub system_instruction: String,
    pub schema: serde_json::Value,
}

#[derive(Default)]
pub struct FakeCompletion {
    replies: Mutex<VecDeque<FakeReply>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Arc<Notify>>,
}

impl FakeCompletion {
    pub fn replying(replies: Vec<FakeReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn with_text(text: &str) -> Self {
        Self::replying(vec![FakeReply::Text(text.to_string())])
    }

    /// Holds every call until `gate` is notified, so tests can observe the
    /// in-flight state.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: request.prompt.to_string(),
            system_instruction: request.system_instruction.to_string(),
            schema: serde_json::to_value(request.response_schema).unwrap(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(FakeReply::Empty);

        match reply {
            FakeReply::Text(text) if !text.trim().is_empty() => Ok(text),
            FakeReply::Text(_) | FakeReply::Empty => Err(LlmError::EmptyContent),
            FakeReply::ApiError { status, message } => Err(LlmError::Api { status, message }),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}
