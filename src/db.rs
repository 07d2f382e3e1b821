use crate::config::Config;
use crate::error::Result;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(config: &Config) -> Result<DbPool> {
    let max_connections = config.database.max_connections.unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&config.database.url)
        .await?;

    Ok(pool)
}

/// Create the devices/readings tables and the query index if they do not
/// exist yet. Safe to run on every startup.
pub async fn init_schema(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS devices (
            id TEXT PRIMARY KEY,
            api_key_hash TEXT NOT NULL,
            name TEXT,
            location TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            last_seen_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id BIGSERIAL PRIMARY KEY,
            device_id TEXT NOT NULL REFERENCES devices(id) ON DELETE CASCADE,
            timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            heart_bpm INTEGER NOT NULL,
            spo2_pct INTEGER NOT NULL,
            skin_temp_f DOUBLE PRECISION NOT NULL,
            env_temp_c DOUBLE PRECISION NOT NULL,
            flame BOOLEAN NOT NULL,
            light_raw INTEGER NOT NULL,
            distance_cm INTEGER NOT NULL,
            aux_raw INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_readings_device_timestamp
        ON readings (device_id, timestamp DESC)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
