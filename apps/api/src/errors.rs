use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::{FailureKind, LlmError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal; none is retried server-side. The status code
/// tells the caller whether retrying later makes sense (429, 504) or not.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing ban reason or appeal text")]
    MissingInput,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("AI Malfunction: {0}")]
    Malfunction(String),

    #[error("AI configuration error: {0}")]
    Configuration(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Malfunction(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Connectivity(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        if matches!(err, LlmError::EmptyContent) {
            return AppError::Malfunction(err.to_string());
        }
        match err.failure_kind() {
            FailureKind::Authentication => AppError::Configuration(err.to_string()),
            FailureKind::RateLimit => AppError::RateLimited(err.to_string()),
            FailureKind::Connectivity => AppError::Connectivity(err.to_string()),
            FailureKind::Unclassified => AppError::Upstream(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::MissingInput => "Missing ban reason or appeal text".to_string(),
            AppError::InvalidBody(detail) => detail.clone(),
            AppError::Malfunction(detail) => {
                tracing::error!("AI malfunction: {detail}");
                "AI Malfunction".to_string()
            }
            AppError::Configuration(detail) => {
                tracing::error!("AI configuration error: {detail}");
                "AI configuration error. Please check API key.".to_string()
            }
            AppError::RateLimited(detail) => {
                tracing::warn!("Completion service rate limited: {detail}");
                "The judge is overwhelmed right now. Please try again shortly.".to_string()
            }
            AppError::Connectivity(detail) => {
                tracing::error!("Completion service unreachable: {detail}");
                "Could not reach the AI service. Please try again.".to_string()
            }
            AppError::Upstream(detail) => {
                tracing::error!("Completion service error: {detail}");
                detail.clone()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "Internal Server Error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_failure_has_a_distinct_status() {
        let statuses = [
            AppError::MissingInput.status(),
            AppError::InvalidBody(String::new()).status(),
            AppError::Malfunction(String::new()).status(),
            AppError::Configuration(String::new()).status(),
            AppError::RateLimited(String::new()).status(),
            AppError::Connectivity(String::new()).status(),
            AppError::Upstream(String::new()).status(),
        ];
        for (i, a) in statuses.iter().enumerate() {
            for b in &statuses[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_llm_errors_map_through_failure_kind() {
        let auth: AppError = LlmError::Api {
            status: 401,
            message: "Invalid API Key".to_string(),
        }
        .into();
        assert_eq!(auth.status(), StatusCode::SERVICE_UNAVAILABLE);

        let rate: AppError = LlmError::Api {
            status: 429,
            message: "slow down".to_string(),
        }
        .into();
        assert_eq!(rate.status(), StatusCode::TOO_MANY_REQUESTS);

        let other: AppError = LlmError::Api {
            status: 500,
            message: "model overloaded".to_string(),
        }
        .into();
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let empty: AppError = LlmError::EmptyContent.into();
        assert_eq!(empty.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_error_body_is_single_error_field() {
        let response = AppError::MissingInput.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "error": "Missing ban reason or appeal text" })
        );
    }
}
