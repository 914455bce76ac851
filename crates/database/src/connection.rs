use crate::error::DbError;
use configuration::DatabaseSettings;
use dotenvy::dotenv;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The URL is read from `DATABASE_URL` (a `.env` file is honoured); pool size
/// and acquire timeout come from the `[database]` settings.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    // A missing .env file is fine as long as the variable is set some other way.
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections = settings.max_connections, "Connected to PostgreSQL.");
    Ok(pool)
}

/// Applies the migrations under `crates/database/migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
