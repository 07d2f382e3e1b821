use crate::db::DbPool;
use crate::error::Result;
use crate::models::Device;

#[derive(Clone)]
pub struct DeviceRepository {
    pool: DbPool,
}

impl DeviceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, device_id: &str) -> Result<Option<Device>> {
        let device = sqlx::query_as::<_, Device>(
            "SELECT id, name, location, last_seen_at FROM devices WHERE id = $1",
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(device)
    }

    pub async fn list_ids(&self) -> Result<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>("SELECT id FROM devices ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    /// Register a device if it is not known yet. The api_key_hash column is
    /// vestigial and stored as an empty string.
    pub async fn ensure_exists(&self, device_id: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO devices (id, api_key_hash) VALUES ($1, '') ON CONFLICT (id) DO NOTHING",
        )
        .bind(device_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn touch_last_seen(&self, device_id: &str) -> Result<()> {
        sqlx::query("UPDATE devices SET last_seen_at = NOW() WHERE id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
