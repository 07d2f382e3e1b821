use chrono::{DateTime, Utc};
use helmet_api::models::NewReading;
use rand::Rng;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

pub type TestDbPool = Pool<Postgres>;

/// Integration tests need a real PostgreSQL instance; they skip themselves
/// when DATABASE_URL is not set.
pub fn test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

pub async fn create_test_pool(database_url: &str) -> Result<TestDbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Sets up the devices/readings schema (same bootstrap the server runs).
pub async fn setup_test_schema(pool: &TestDbPool) -> helmet_api::Result<()> {
    helmet_api::db::init_schema(pool).await
}

/// Removes one device and its readings. Tests use unique device ids, so
/// per-device cleanup keeps parallel tests out of each other's way.
pub async fn cleanup_device(pool: &TestDbPool, device_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM readings WHERE device_id = $1")
        .bind(device_id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM devices WHERE id = $1")
        .bind(device_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn register_device(pool: &TestDbPool, device_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO devices (id, api_key_hash) VALUES ($1, '') ON CONFLICT (id) DO NOTHING")
        .bind(device_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// A reading with every metric inside its normal range.
pub fn normal_reading(timestamp: Option<DateTime<Utc>>) -> NewReading {
    let mut rng = rand::thread_rng();

    NewReading {
        heart_bpm: rng.gen_range(65..95),
        spo2_pct: rng.gen_range(95..=99),
        skin_temp_f: 98.2,
        env_temp_c: 24.0,
        flame: false,
        light_raw: rng.gen_range(0..1024),
        distance_cm: rng.gen_range(10..200),
        aux_raw: 0,
        timestamp,
    }
}
