pub mod alerts;
pub mod devices;
pub mod health;
pub mod readings;

use crate::db::DbPool;
use crate::services::{AlertService, TelemetryService};

#[derive(Clone)]
pub struct AppState {
    pub telemetry: TelemetryService,
    pub alerts: AlertService,
    pub pool: DbPool,
}
