use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Device, NewReading, Reading, ReadingPayload, ReadingsQuery, UpdateParams};
use crate::repositories::{DeviceRepository, ReadingRepository};

/// Device id used by the ThingSpeak-compatible /update endpoint. The
/// deployed Arduino firmware does not send a device id, so every /update
/// sample is attributed to this helmet.
pub const UPDATE_DEVICE_ID: &str = "helmet-001";

const MAX_PAGE_SIZE: i64 = 500;

#[derive(Clone)]
pub struct TelemetryService {
    devices: DeviceRepository,
    readings: ReadingRepository,
}

impl TelemetryService {
    pub fn new(devices: DeviceRepository, readings: ReadingRepository) -> Self {
        Self { devices, readings }
    }

    /// Validate and store one JSON reading, then bump the device's
    /// last-seen timestamp.
    pub async fn ingest(&self, payload: ReadingPayload) -> Result<()> {
        let device = self
            .authenticate_device(payload.device_id.as_deref().unwrap_or(""))
            .await?;
        let reading = validate_payload(&payload)?;

        self.readings.insert(&device.id, &reading).await?;
        self.devices.touch_last_seen(&device.id).await?;

        Ok(())
    }

    /// Store one reading arriving through the ThingSpeak-compatible query
    /// string. The device row is created on the fly so old firmware keeps
    /// working without provisioning.
    pub async fn ingest_update(&self, params: &UpdateParams) -> Result<()> {
        let reading = validate_update(params)?;

        self.devices.ensure_exists(UPDATE_DEVICE_ID).await?;
        self.readings.insert(UPDATE_DEVICE_ID, &reading).await?;
        self.devices.touch_last_seen(UPDATE_DEVICE_ID).await?;

        Ok(())
    }

    /// Recent readings for one device, newest first. `size` is required,
    /// must be positive and is capped at 500.
    pub async fn recent_readings(&self, query: &ReadingsQuery) -> Result<Vec<Reading>> {
        let device = self
            .authenticate_device(query.device_id.as_deref().unwrap_or(""))
            .await?;
        let size = parse_size(query.size.as_deref())?;

        self.readings.find_recent(&device.id, size).await
    }

    pub async fn list_device_ids(&self) -> Result<Vec<String>> {
        self.devices.list_ids().await
    }

    /// Existence check standing in for real authentication: the device id
    /// must already be registered. API keys are not verified.
    async fn authenticate_device(&self, device_id: &str) -> Result<Device> {
        if device_id.is_empty() {
            return Err(AppError::Validation("device_id is required".to_string()));
        }

        self.devices
            .find(device_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown device".to_string()))
    }
}

fn validate_payload(payload: &ReadingPayload) -> Result<NewReading> {
    Ok(NewReading {
        heart_bpm: parse_int(payload.heart_bpm.as_ref(), "heart_bpm")?,
        spo2_pct: parse_int(payload.spo2_pct.as_ref(), "spo2_pct")?,
        skin_temp_f: parse_number(payload.skin_temp_f.as_ref(), "skin_temp_f")?,
        env_temp_c: parse_number(payload.env_temp_c.as_ref(), "env_temp_c")?,
        flame: parse_flame(payload.flame.as_ref())?,
        light_raw: parse_int(payload.light_raw.as_ref(), "light_raw")?,
        distance_cm: parse_int(payload.distance_cm.as_ref(), "distance_cm")?,
        aux_raw: parse_int(payload.aux_raw.as_ref(), "aux_raw")?,
        timestamp: parse_timestamp(payload.timestamp.as_ref())?,
    })
}

/// field1..field8 carry heart_bpm, spo2_pct, skin_temp_f, env_temp_c,
/// flame, light_raw, distance_cm and aux_raw, in that order.
fn validate_update(params: &UpdateParams) -> Result<NewReading> {
    let field = |v: &Option<String>| v.as_deref().map(Value::from);

    Ok(NewReading {
        heart_bpm: parse_int(field(&params.field1).as_ref(), "field1")?,
        spo2_pct: parse_int(field(&params.field2).as_ref(), "field2")?,
        skin_temp_f: parse_number(field(&params.field3).as_ref(), "field3")?,
        env_temp_c: parse_number(field(&params.field4).as_ref(), "field4")?,
        flame: parse_flame(field(&params.field5).as_ref())?,
        light_raw: parse_int(field(&params.field6).as_ref(), "field6")?,
        distance_cm: parse_int(field(&params.field7).as_ref(), "field7")?,
        aux_raw: parse_int(field(&params.field8).as_ref(), "field8")?,
        timestamp: None,
    })
}

/// Required numeric field. The firmware sends numbers either as JSON
/// numbers or as strings, so both are accepted.
fn parse_number(value: Option<&Value>, field: &str) -> Result<f64> {
    let num = match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => {
            return s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| AppError::Validation(format!("{field} must be a number")));
        }
        Some(_) => {
            return Err(AppError::Validation(format!("{field} must be a number")));
        }
    };

    match num {
        Some(n) if n.is_finite() => Ok(n),
        Some(_) => Err(AppError::Validation(format!("{field} must be a number"))),
        None => Err(AppError::Validation(format!("{field} is required"))),
    }
}

fn parse_int(value: Option<&Value>, field: &str) -> Result<i32> {
    let num = parse_number(value, field)?;
    if num.fract() != 0.0 {
        return Err(AppError::Validation(format!("{field} must be an integer")));
    }

    i32::try_from(num as i64)
        .map_err(|_| AppError::Validation(format!("{field} must be an integer")))
}

/// Flame arrives as a boolean from newer firmware and as 0/1 from the
/// analog sensor path.
fn parse_flame(value: Option<&Value>) -> Result<bool> {
    match value {
        Some(Value::Bool(b)) => Ok(*b),
        _ => match parse_number(value, "flame") {
            Ok(n) if n == 0.0 => Ok(false),
            Ok(n) if n == 1.0 => Ok(true),
            _ => Err(AppError::Validation("flame must be 0 or 1".to_string())),
        },
    }
}

/// Optional timestamp: epoch milliseconds (number or numeric string) or an
/// RFC 3339 string. Absent means "use ingestion time".
fn parse_timestamp(value: Option<&Value>) -> Result<Option<DateTime<Utc>>> {
    let invalid =
        || AppError::Validation("timestamp must be a valid ISO string or epoch".to_string());

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::Number(n)) => {
            let millis = n.as_f64().ok_or_else(invalid)?;
            epoch_millis(millis).map(Some).ok_or_else(invalid)
        }
        Some(Value::String(s)) => {
            if let Ok(millis) = s.trim().parse::<f64>() {
                return epoch_millis(millis).map(Some).ok_or_else(invalid);
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|_| invalid())
        }
        Some(_) => Err(invalid()),
    }
}

fn epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

/// Mirrors the dashboard's contract: `size` is a required positive number,
/// truncated to an integer and capped at 500.
fn parse_size(size: Option<&str>) -> Result<i64> {
    let parsed = size
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.floor() as i64)
        .ok_or_else(|| AppError::Validation("size must be a positive integer".to_string()))?;

    Ok(parsed.min(MAX_PAGE_SIZE))
}
