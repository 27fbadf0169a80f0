//! Append-only log of judgments. Nothing in the service reads it back.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::judgment::JudgmentLogEntry;

/// Destination for judgment records. Carried in `AppState` as `Arc<dyn JudgmentLog>`.
#[async_trait]
pub trait JudgmentLog: Send + Sync {
    async fn append(&self, entry: &JudgmentLogEntry) -> Result<()>;
}

/// Writes judgments to the PostgreSQL `judgments` table.
pub struct PgJudgmentLog {
    pool: PgPool,
}

impl PgJudgmentLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JudgmentLog for PgJudgmentLog {
    async fn append(&self, entry: &JudgmentLogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO judgments
                (id, ban_reason, appeal_text, verdict, bs_score, detected_lie, full_response, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.ban_reason)
        .bind(&entry.appeal_text)
        .bind(&entry.verdict)
        .bind(entry.bs_score)
        .bind(&entry.detected_lie)
        .bind(&entry.full_response)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert judgment {}", entry.id))?;

        Ok(())
    }
}
