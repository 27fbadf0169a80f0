pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::judge::handlers;
use crate::scorecard;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/judge", post(handlers::handle_judge))
        .route("/api/judge/scorecard", post(scorecard::handle_scorecard))
        .with_state(state)
}
