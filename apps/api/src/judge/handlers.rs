//! Axum route handlers for the Judge API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::judge::service::{judge_appeal, JudgeRequest};
use crate::models::judgment::Judgment;
use crate::state::AppState;

/// POST /api/judge
///
/// Judges one ban appeal. A body that cannot be read as a request counts as missing input.
pub async fn handle_judge(
    State(state): State<AppState>,
    payload: Result<Json<JudgeRequest>, JsonRejection>,
) -> Result<Json<Judgment>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected judge request body: {rejection}");
        AppError::MissingInput
    })?;

    let judgment = judge_appeal(
        state.completion.as_ref(),
        state.judgment_log.as_ref(),
        &request,
    )
    .await?;

    Ok(Json(judgment))
}
