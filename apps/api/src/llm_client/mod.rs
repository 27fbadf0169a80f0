//! LLM Client — the single point of entry for all completion calls in the judge.
//!
//! ARCHITECTURAL RULE: No other module may call the Groq API directly.
//! All LLM interactions MUST go through this module.
//!
//! Model, temperature and token ceiling are fixed so every appeal is judged
//! under the same parameters.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// The model used for every judgment.
pub const MODEL: &str = "llama-3.3-70b-versatile";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GROQ_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// How a failed completion call should be reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    RateLimit,
    Connectivity,
    Unclassified,
}

impl LlmError {
    /// Classifies the failure from its status code and message.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            LlmError::MissingApiKey => FailureKind::Authentication,
            LlmError::Api { status, message } => classify_signal(Some(*status), message),
            LlmError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return FailureKind::Connectivity;
                }
                match classify_signal(e.status().map(|s| s.as_u16()), &e.to_string()) {
                    FailureKind::Unclassified if mentions_connectivity(&e.to_string()) => {
                        FailureKind::Connectivity
                    }
                    kind => kind,
                }
            }
            LlmError::EmptyContent => FailureKind::Unclassified,
        }
    }
}

fn classify_signal(status: Option<u16>, message: &str) -> FailureKind {
    match status {
        Some(401) | Some(403) => return FailureKind::Authentication,
        Some(429) => return FailureKind::RateLimit,
        _ => {}
    }

    let message = message.to_lowercase();
    if ["api key", "api_key", "apikey", "unauthorized", "authentication"]
        .iter()
        .any(|needle| message.contains(needle))
    {
        FailureKind::Authentication
    } else if ["rate limit", "rate_limit", "too many requests"]
        .iter()
        .any(|needle| message.contains(needle))
    {
        FailureKind::RateLimit
    } else {
        FailureKind::Unclassified
    }
}

fn mentions_connectivity(message: &str) -> bool {
    let message = message.to_lowercase();
    [
        "connect",
        "network",
        "dns",
        "timed out",
        "timeout",
        "unreachable",
    ]
    .iter()
    .any(|needle| message.contains(needle))
}

/// Text-in / text-out completion seam. `LlmClient` is the production backend.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the raw text of the first choice.
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Wraps Groq's OpenAI-compatible chat completions endpoint.
///
/// One attempt per call. No client-side timeout is configured; whatever the
/// transport defaults to applies.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Makes a single chat completion call, returning the full response object.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Removes every ```json and ``` marker from LLM output and trims the rest.
pub fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

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
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_removes_inner_markers() {
        let input = "```json{\"a\": 1}``````";
        assert_eq!(strip_json_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_status_codes_drive_classification() {
        let cases = [
            (401, FailureKind::Authentication),
            (403, FailureKind::Authentication),
            (429, FailureKind::RateLimit),
            (500, FailureKind::Unclassified),
            (400, FailureKind::Unclassified),
        ];
        for (status, expected) in cases {
            let err = LlmError::Api {
                status,
                message: "something went wrong".to_string(),
            };
            assert_eq!(err.failure_kind(), expected, "status {status}");
        }
    }

    #[test]
    fn test_messages_drive_classification_when_status_is_ambiguous() {
        let auth = LlmError::Api {
            status: 400,
            message: "Invalid API Key".to_string(),
        };
        assert_eq!(auth.failure_kind(), FailureKind::Authentication);

        let rate = LlmError::Api {
            status: 503,
            message: "Rate limit reached for model".to_string(),
        };
        assert_eq!(rate.failure_kind(), FailureKind::RateLimit);
    }

    #[test]
    fn test_missing_api_key_is_authentication() {
        assert_eq!(
            LlmError::MissingApiKey.failure_kind(),
            FailureKind::Authentication
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_short_circuits_before_network() {
        // Unroutable base URL: reaching the network would yield a connectivity error instead.
        let client = LlmClient::new(String::new()).with_base_url("http://127.0.0.1:1");
        let err = client.complete("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_refused_connection_is_connectivity() {
        let client = LlmClient::new("test-key".to_string()).with_base_url("http://127.0.0.1:1/");
        let err = client.complete("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)), "got {err:?}");
        assert_eq!(err.failure_kind(), FailureKind::Connectivity);
    }

    #[test]
    fn test_response_text_skips_blank_content() {
        let response: LlmResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"   "}}]}"#,
        )
        .unwrap();
        assert!(response.text().is_none());

        let response: LlmResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{}"}}],
                "usage":{"prompt_tokens":10,"completion_tokens":2,"total_tokens":12}}"#,
        )
        .unwrap();
        assert_eq!(response.text(), Some("{}"));
    }
}
