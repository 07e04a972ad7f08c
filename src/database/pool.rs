use crate::config::get_config;
use crate::error::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Connects to Postgres using `DATABASE_URL` from the loaded configuration.
/// Analytics requests can hold a connection for the whole snapshot load, so
/// the pool keeps a couple of warm connections and a short acquire timeout.
pub async fn create_pool() -> Result<PgPool> {
    let config = get_config();
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}
