pub mod alerts;
pub mod telemetry;

pub use alerts::AlertService;
pub use telemetry::TelemetryService;
