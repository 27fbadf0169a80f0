//! Appeal judging: validate → prompt → one completion call → parse → log → return.
//!
//! The completion call and the log write run one after the other. A failed
//! log write is reported in the logs only; it never changes the result.

use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::judge::prompts::build_judge_prompt;
use crate::judge::store::JudgmentLog;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, CompletionService};
use crate::models::judgment::{Judgment, JudgmentLogEntry};

/// Request body for `POST /api/judge`. Absent fields count as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeRequest {
    #[serde(default)]
    pub ban_reason: String,
    #[serde(default)]
    pub appeal_text: String,
}

impl JudgeRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.ban_reason.is_empty() || self.appeal_text.is_empty() {
            return Err(AppError::MissingInput);
        }
        Ok(())
    }
}

/// Judges one appeal.
pub async fn judge_appeal(
    completion: &dyn CompletionService,
    judgment_log: &dyn JudgmentLog,
    request: &JudgeRequest,
) -> Result<Judgment, AppError> {
    request.validate()?;

    let prompt = build_judge_prompt(&request.ban_reason, &request.appeal_text);
    let raw = completion.complete(&prompt, JSON_ONLY_SYSTEM).await?;

    let judgment = parse_judgment(&raw)?;
    info!(
        "Appeal judged: verdict={} copium_index={}",
        judgment.verdict, judgment.copium_index
    );

    let entry = JudgmentLogEntry::new(&request.ban_reason, &request.appeal_text, &judgment);
    if let Err(e) = judgment_log.append(&entry).await {
        error!("Failed to log judgment {}: {e:?}", entry.id);
    }

    Ok(judgment)
}

/// Strips code fences from the model reply and parses it as a `Judgment`.
pub fn parse_judgment(raw: &str) -> Result<Judgment, AppError> {
    let cleaned = strip_json_fences(raw);
    serde_json::from_str(&cleaned).map_err(|e| {
        error!("Failed to parse completion response: {raw}");
        AppError::Malfunction(e.to_string())
    })
}
