use axum::{extract::State, Json};

use super::AppState;
use crate::error::Result;

/// GET /api/v1/devices lists all registered device ids.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let ids = state.telemetry.list_device_ids().await?;
    Ok(Json(ids))
}
