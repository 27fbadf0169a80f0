//! Scorecard — everything the shareable verdict card shows, derived from a `Judgment`.
//!
//! The card is stateless: it is computed from the judgment the caller already
//! holds plus the public URL and issue date. Image export is left to the client.

use std::fmt;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::judgment::{Judgment, Verdict};
use crate::state::AppState;

const SHARE_INTENT_URL: &str = "https://twitter.com/intent/tweet";
const FOOTER_BRAND: &str = "JUDGE.GATEKEEPER.AI";

/// Severity band of the Copium Index. Drives the card colour and share emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    /// > 70
    High,
    /// 41 – 70
    Moderate,
    /// ≤ 40
    Low,
}

impl SeverityBand {
    pub fn for_index(copium_index: u8) -> Self {
        if copium_index > 70 {
            SeverityBand::High
        } else if copium_index > 40 {
            SeverityBand::Moderate
        } else {
            SeverityBand::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SeverityBand::High => "red",
            SeverityBand::Moderate => "orange",
            SeverityBand::Low => "green",
        }
    }

    fn emoji(&self) -> &'static str {
        match self {
            SeverityBand::High => "💨",
            SeverityBand::Moderate => "🤔",
            SeverityBand::Low => "👏",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub stamp: Verdict,
    pub copium_index: u8,
    pub band: SeverityBand,
    pub band_color: &'static str,
    pub excerpt_label: &'static str,
    pub excerpt: String,
    pub reasoning: String,
    pub styles: Vec<String>,
    pub share_prompt: &'static str,
    pub share_text: String,
    pub share_url: String,
    pub download_filename: String,
    pub footer: &'static str,
    pub issued_on: NaiveDate,
}

impl Scorecard {
    pub fn from_judgment(
        judgment: &Judgment,
        public_url: &str,
        issued_on: NaiveDate,
    ) -> Result<Self, AppError> {
        let band = SeverityBand::for_index(judgment.copium_index);
        let share_text = share_text(judgment, band);
        let share_url = Url::parse_with_params(
            SHARE_INTENT_URL,
            &[("text", share_text.as_str()), ("url", public_url)],
        )
        .map_err(|e| AppError::Internal(e.into()))?
        .to_string();

        let (excerpt_label, share_prompt) = match judgment.verdict {
            Verdict::Denied => (
                "Red Flag",
                "🎭 This cope is too good not to share. Expose the BS!",
            ),
            Verdict::Granted => (
                "Key Insight",
                "🎉 A rare genuine appeal! Share this unicorn!",
            ),
        };

        Ok(Self {
            stamp: judgment.verdict,
            copium_index: judgment.copium_index,
            band,
            band_color: band.color(),
            excerpt_label,
            excerpt: judgment.red_flag.clone(),
            reasoning: judgment.reasoning.clone(),
            styles: judgment.styles.clone(),
            share_prompt,
            share_text,
            share_url,
            download_filename: format!(
                "ban-appeal-verdict-{}pct-copium.png",
                judgment.copium_index
            ),
            footer: FOOTER_BRAND,
            issued_on,
        })
    }
}

fn share_text(judgment: &Judgment, band: SeverityBand) -> String {
    let verdict = match judgment.verdict {
        Verdict::Denied => "🚫 DENIED",
        Verdict::Granted => "✅ GRANTED",
    };
    format!(
        "{verdict} {}\n\nCopium Index: {}%\nRed Flag: \"{}\"\n\nJudge your ban appeals with AI 👉",
        band.emoji(),
        judgment.copium_index,
        judgment.red_flag
    )
}

/// Plain-text rendering of the card.
impl fmt::Display for Scorecard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.stamp)?;
        writeln!(f, "Copium Index: {}% ({})", self.copium_index, self.band_color)?;
        writeln!(f, "{}: \"{}\"", self.excerpt_label, self.excerpt)?;
        writeln!(f, "Judge's Notes: {}", self.reasoning)?;
        if !self.styles.is_empty() {
            writeln!(f, "Flags: {}", self.styles.join(", "))?;
        }
        write!(f, "{} · {}", self.footer, self.issued_on.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ScorecardQuery {
    pub format: Option<String>,
}

/// POST /api/judge/scorecard
///
/// Builds the shareable card for a judgment. `?format=text` returns the plain-text card.
pub async fn handle_scorecard(
    State(state): State<AppState>,
    Query(query): Query<ScorecardQuery>,
    payload: Result<Json<Judgment>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(judgment) =
        payload.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;
    let card = Scorecard::from_judgment(
        &judgment,
        &state.config.public_url,
        Utc::now().date_naive(),
    )?;

    match query.format.as_deref() {
        Some("text") => Ok(card.to_string().into_response()),
        _ => Ok(Json(card).into_response()),
    }
}
