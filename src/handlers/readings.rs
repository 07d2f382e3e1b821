use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::AppState;
use crate::error::Result;
use crate::models::{Reading, ReadingPayload, ReadingsQuery, UpdateParams};

/// POST /api/v1/readings
pub async fn ingest(
    State(state): State<AppState>,
    payload: Option<Json<ReadingPayload>>,
) -> Result<StatusCode> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    tracing::debug!(device_id = ?payload.device_id, "incoming reading");

    state.telemetry.ingest(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/readings?device_id=...&size=...
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
) -> Result<Json<Vec<Reading>>> {
    let readings = state.telemetry.recent_readings(&query).await?;
    Ok(Json(readings))
}

/// GET /update?api_key=...&field1=...&...&field8=...
///
/// ThingSpeak-compatible ingestion so the existing Arduino GET code keeps
/// working. Clients treat a non-zero response body as success.
pub async fn thingspeak_update(
    State(state): State<AppState>,
    Query(params): Query<UpdateParams>,
) -> Result<&'static str> {
    tracing::debug!("incoming /update sample");

    state.telemetry.ingest_update(&params).await?;
    Ok("1")
}
