use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Upper bound of the Copium Index scale.
pub const MAX_COPIUM_INDEX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Denied,
    Granted,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Denied => "DENIED",
            Verdict::Granted => "GRANTED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured verdict the model returns for one appeal.
///
/// Keys are camelCase on the wire so the response body has the same shape the
/// prompt asks the model to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judgment {
    pub verdict: Verdict,
    /// 0 = completely genuine, 100 = maximum cope.
    #[serde(deserialize_with = "deserialize_copium_index")]
    pub copium_index: u8,
    /// Quoted excerpt: the most cope-filled part when denied, the most genuine when granted.
    pub red_flag: String,
    pub reasoning: String,
    #[serde(default)]
    pub styles: Vec<String>,
}

/// Accepts any JSON number, rounds fractions, and rejects values off the 0-100 scale.
fn deserialize_copium_index<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("copiumIndex must be a finite number"));
    }
    let rounded = raw.round();
    if !(0.0..=f64::from(MAX_COPIUM_INDEX)).contains(&rounded) {
        return Err(serde::de::Error::custom(format!(
            "copiumIndex {raw} is outside 0-{MAX_COPIUM_INDEX}"
        )));
    }
    Ok(rounded as u8)
}

/// Row appended to the `judgments` table for every successful judgment.
#[derive(Debug, Clone, Serialize)]
pub struct JudgmentLogEntry {
    pub id: Uuid,
    pub ban_reason: String,
    pub appeal_text: String,
    pub verdict: String,
    pub bs_score: i16,
    pub detected_lie: String,
    pub full_response: Value,
    pub created_at: DateTime<Utc>,
}

impl JudgmentLogEntry {
    pub fn new(ban_reason: &str, appeal_text: &str, judgment: &Judgment) -> Self {
        Self {
            id: Uuid::new_v4(),
            ban_reason: ban_reason.to_string(),
            appeal_text: appeal_text.to_string(),
            verdict: judgment.verdict.as_str().to_string(),
            bs_score: i16::from(judgment.copium_index),
            detected_lie: judgment.red_flag.clone(),
            full_response: serde_json::to_value(judgment).unwrap_or(Value::Null),
            created_at: Utc::now(),
        }
    }
}
