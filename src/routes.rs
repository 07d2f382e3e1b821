use axum::{
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{alerts, devices, health, readings, AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/update", get(readings::thingspeak_update))
        .route(
            "/api/v1/readings",
            get(readings::list).post(readings::ingest),
        )
        .route("/api/v1/devices", get(devices::list))
        .route(
            "/api/v1/devices/:device_id/health",
            get(alerts::device_health),
        )
        .route("/api/v1/alerts", get(alerts::fleet))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
