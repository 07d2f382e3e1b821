use axum::{
    extract::{Path, State},
    Json,
};

use super::AppState;
use crate::alerts::{FleetAlertSummary, HealthStatus};
use crate::error::Result;

/// GET /api/v1/alerts returns the merged alert snapshot for the whole fleet.
pub async fn fleet(State(state): State<AppState>) -> Result<Json<FleetAlertSummary>> {
    let summary = state.alerts.fleet_alerts().await?;
    Ok(Json(summary))
}

/// GET /api/v1/devices/:device_id/health evaluates one
/// device's latest reading.
pub async fn device_health(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<HealthStatus>> {
    let status = state.alerts.device_health(&device_id).await?;
    Ok(Json(status))
}
