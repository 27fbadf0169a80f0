//! In-memory fakes for the completion service and the judgment log.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::judge::store::JudgmentLog;
use crate::llm_client::{CompletionService, LlmError};
use crate::models::judgment::JudgmentLogEntry;

type Reply = Box<dyn Fn() -> Result<String, LlmError> + Send + Sync>;

/// Completion service that answers every call from a canned closure and counts calls.
pub struct StubCompletion {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubCompletion {
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with(move || Ok(text.clone()))
    }

    pub fn failing(make_error: impl Fn() -> LlmError + Send + Sync + 'static) -> Self {
        Self::with(move || Err(make_error()))
    }

    fn with(reply: impl Fn() -> Result<String, LlmError> + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.reply)()
    }
}

/// Judgment log that keeps entries in memory, or rejects every append.
#[derive(Default)]
pub struct MemoryJudgmentLog {
    entries: Mutex<Vec<JudgmentLogEntry>>,
    fail: bool,
}

impl MemoryJudgmentLog {
    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn entries(&self) -> Vec<JudgmentLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl JudgmentLog for MemoryJudgmentLog {
    async fn append(&self, entry: &JudgmentLogEntry) -> Result<()> {
        if self.fail {
            return Err(anyhow!("connection to judgments store refused"));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

pub const DENIED_REPLY: &str = r#"{
  "verdict": "DENIED",
  "copiumIndex": 88,
  "redFlag": "my little brother was using my keyboard",
  "reasoning": "Blames a sibling and never addresses the phishing links.",
  "styles": ["Blame Shifter", "Maximum Cope"]
}"#;
