mod config;
mod db;
mod errors;
mod judge;
mod llm_client;
mod models;
mod routes;
mod scorecard;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::judge::store::PgJudgmentLog;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ban Appeal Judge v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (judgment log)
    let db = create_pool(&config.database_url)?;
    run_migrations(&db).await;

    // Initialize LLM client
    if config.groq_api_key.is_empty() {
        warn!("GROQ_API_KEY is not set; every judgment will fail with a configuration error");
    }
    let llm = LlmClient::new(config.groq_api_key.clone()).with_base_url(&config.groq_base_url);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        completion: Arc::new(llm),
        judgment_log: Arc::new(PgJudgmentLog::new(db)),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
