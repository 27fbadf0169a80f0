use std::sync::Arc;

use crate::config::Config;
use crate::judge::store::JudgmentLog;
use crate::llm_client::CompletionService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. Default: `LlmClient` against Groq.
    pub completion: Arc<dyn CompletionService>,
    /// Append-only judgment log. Default: `PgJudgmentLog`.
    pub judgment_log: Arc<dyn JudgmentLog>,
    pub config: Config,
}
