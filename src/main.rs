use helmet_api::alerts::{AlertEvaluator, Thresholds};
use helmet_api::handlers::AppState;
use helmet_api::repositories::{DeviceRepository, ReadingRepository};
use helmet_api::services::{AlertService, TelemetryService};
use helmet_api::{create_pool, db, routes, Config};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Create database pool and bootstrap the schema
    let pool = create_pool(&config).await?;
    db::init_schema(&pool).await?;
    info!("Database connection pool created");

    // Initialize repositories and services
    let devices = DeviceRepository::new(pool.clone());
    let readings = ReadingRepository::new(pool.clone());
    let telemetry = TelemetryService::new(devices.clone(), readings.clone());
    let alerts = AlertService::new(devices, readings, AlertEvaluator::new(Thresholds::default()));

    // Create router
    let app = routes::create_router(AppState {
        telemetry,
        alerts,
        pool,
    });

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
