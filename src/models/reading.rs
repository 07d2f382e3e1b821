use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// One stored multi-sensor sample. Metric columns are NOT NULL in the
/// schema, but the model keeps them optional so historic rows with missing
/// values still decode and simply contribute no alerts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reading {
    pub id: i64,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub heart_bpm: Option<i32>,
    pub spo2_pct: Option<i32>,
    pub skin_temp_f: Option<f64>,
    pub env_temp_c: Option<f64>,
    pub flame: Option<bool>,
    pub light_raw: Option<i32>,
    pub distance_cm: Option<i32>,
    pub aux_raw: Option<i32>,
}

/// Raw ingestion body for POST /api/v1/readings. Helmet firmware sends
/// numbers as JSON numbers or as strings, so every field comes in as an
/// untyped value and is validated in the telemetry service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingPayload {
    pub device_id: Option<String>,
    pub heart_bpm: Option<Value>,
    pub spo2_pct: Option<Value>,
    pub skin_temp_f: Option<Value>,
    pub env_temp_c: Option<Value>,
    pub flame: Option<Value>,
    pub light_raw: Option<Value>,
    pub distance_cm: Option<Value>,
    pub aux_raw: Option<Value>,
    pub timestamp: Option<Value>,
}

/// A fully validated reading, ready to insert. All metrics are required at
/// ingestion; only the timestamp may be absent (server time is used).
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub heart_bpm: i32,
    pub spo2_pct: i32,
    pub skin_temp_f: f64,
    pub env_temp_c: f64,
    pub flame: bool,
    pub light_raw: i32,
    pub distance_cm: i32,
    pub aux_raw: i32,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Query string for the ThingSpeak-compatible GET /update endpoint.
/// field1..field8 carry the sensor values; api_key is accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateParams {
    pub api_key: Option<String>,
    pub field1: Option<String>,
    pub field2: Option<String>,
    pub field3: Option<String>,
    pub field4: Option<String>,
    pub field5: Option<String>,
    pub field6: Option<String>,
    pub field7: Option<String>,
    pub field8: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadingsQuery {
    pub device_id: Option<String>,
    /// Kept as a string so validation can report bad values itself instead
    /// of surfacing an extractor rejection.
    pub size: Option<String>,
}
