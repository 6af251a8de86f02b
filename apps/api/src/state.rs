use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::llm_client::CompletionService;
use crate::workspace::Workspace;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Structured-output completion backend. `GeminiClient` in production.
    pub llm: Arc<dyn CompletionService>,
    pub config: Config,
    /// The page session. Never held across a completion call.
    pub workspace: Arc<Mutex<Workspace>>,
}

impl AppState {
    pub fn new(llm: Arc<dyn CompletionService>, config: Config) -> Self {
        Self {
            llm,
            config,
            workspace: Arc::new(Mutex::new(Workspace::default())),
        }
    }
}
