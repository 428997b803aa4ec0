use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;

/// Connects the pool and makes sure the `users` table and its unique email index exist.
pub async fn init(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(cfg.max_pool_size)
        .acquire_timeout(Duration::from_millis(cfg.connection_timeout_ms))
        .connect(&cfg.url())
        .await
        .with_context(|| format!("connect to database {}:{}/{}", cfg.host, cfg.port, cfg.name))?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run database migrations")?;

    info!(host = %cfg.host, port = cfg.port, database = %cfg.name, "connected to database");
    Ok(db)
}
