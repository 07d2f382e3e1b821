use futures::future::join_all;

use crate::alerts::{AlertEvaluator, FleetAlertSummary, HealthStatus};
use crate::error::{AppError, Result};
use crate::repositories::{DeviceRepository, ReadingRepository};

/// Runs the evaluator against the store: single-device health checks and
/// the fleet-wide alert snapshot. Holds no state between calls.
#[derive(Clone)]
pub struct AlertService {
    devices: DeviceRepository,
    readings: ReadingRepository,
    evaluator: AlertEvaluator,
}

impl AlertService {
    pub fn new(
        devices: DeviceRepository,
        readings: ReadingRepository,
        evaluator: AlertEvaluator,
    ) -> Self {
        Self {
            devices,
            readings,
            evaluator,
        }
    }

    /// Health of one device, judged from its latest reading. A registered
    /// device that has never reported is `unknown`, not an error.
    pub async fn device_health(&self, device_id: &str) -> Result<HealthStatus> {
        if self.devices.find(device_id).await?.is_none() {
            return Err(AppError::Unauthorized("Unknown device".to_string()));
        }

        let latest = self.readings.find_latest(device_id).await?;
        Ok(self.evaluator.evaluate(latest.as_ref()))
    }

    /// Fresh alert snapshot across every registered device. Failing to
    /// enumerate devices fails the whole call; per-device fetch failures
    /// do not.
    pub async fn fleet_alerts(&self) -> Result<FleetAlertSummary> {
        let device_ids = self.devices.list_ids().await?;
        Ok(self.aggregate(&device_ids).await)
    }

    /// Evaluate the latest reading of each given device and merge the
    /// results. Fetches fan out concurrently; a failed fetch for one
    /// device is logged and that device simply contributes no alerts.
    pub async fn aggregate(&self, device_ids: &[String]) -> FleetAlertSummary {
        let fetches = device_ids.iter().map(|device_id| async move {
            match self.readings.find_latest(device_id).await {
                Ok(reading) => reading,
                Err(e) => {
                    tracing::warn!(device_id = %device_id, "failed to fetch latest reading: {e}");
                    None
                }
            }
        });

        let mut alerts = Vec::new();
        for reading in join_all(fetches).await.into_iter().flatten() {
            alerts.extend(self.evaluator.evaluate(Some(&reading)).alerts);
        }

        FleetAlertSummary::from_alerts(alerts)
    }
}
