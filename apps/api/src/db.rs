use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

/// Creates a PostgreSQL pool that connects on first use, so an unreachable
/// store never blocks startup.
pub fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(database_url)?;

    info!("PostgreSQL pool configured (lazy connect)");
    Ok(pool)
}

/// Applies embedded migrations. Failure is logged and startup continues;
/// judgment logging then fails per request and is ignored.
pub async fn run_migrations(pool: &PgPool) {
    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => info!("Database migrations applied"),
        Err(e) => warn!("Skipping database migrations: {e}"),
    }
}
