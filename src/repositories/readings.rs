use crate::db::DbPool;
use crate::error::Result;
use crate::models::{NewReading, Reading};

const READING_COLUMNS: &str = "id, device_id, timestamp, heart_bpm, spo2_pct, skin_temp_f, \
     env_temp_c, flame, light_raw, distance_cm, aux_raw";

#[derive(Clone)]
pub struct ReadingRepository {
    pool: DbPool,
}

impl ReadingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert one validated reading. When the payload carried no timestamp
    /// the row gets the ingestion time.
    pub async fn insert(&self, device_id: &str, reading: &NewReading) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO readings (
                device_id, timestamp, heart_bpm, spo2_pct, skin_temp_f,
                env_temp_c, flame, light_raw, distance_cm, aux_raw
            )
            VALUES ($1, COALESCE($2, NOW()), $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(device_id)
        .bind(reading.timestamp)
        .bind(reading.heart_bpm)
        .bind(reading.spo2_pct)
        .bind(reading.skin_temp_f)
        .bind(reading.env_temp_c)
        .bind(reading.flame)
        .bind(reading.light_raw)
        .bind(reading.distance_cm)
        .bind(reading.aux_raw)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent readings for one device, newest first.
    pub async fn find_recent(&self, device_id: &str, limit: i64) -> Result<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(&format!(
            "SELECT {READING_COLUMNS} FROM readings \
             WHERE device_id = $1 ORDER BY timestamp DESC LIMIT $2"
        ))
        .bind(device_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    /// The single most recent reading for a device, if it has ever reported.
    pub async fn find_latest(&self, device_id: &str) -> Result<Option<Reading>> {
        let reading = sqlx::query_as::<_, Reading>(&format!(
            "SELECT {READING_COLUMNS} FROM readings \
             WHERE device_id = $1 ORDER BY timestamp DESC LIMIT 1"
        ))
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reading)
    }
}
