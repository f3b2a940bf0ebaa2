use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::DbConfig;

pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(cfg.acquire_timeout())
        .connect(&cfg.url)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Creates the `users` table if it is missing. Callers treat failure as fatal.
pub async fn ensure_schema(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("create users table")?;
    info!("users table created or already exists");
    Ok(())
}
