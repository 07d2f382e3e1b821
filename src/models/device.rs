use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
}
