use serde::{Deserialize, Serialize};

use super::evaluator::{Alert, Severity};

/// Merged view of the whole fleet's current alerts: most severe first,
/// newest first within a severity. Counts are per alert, not per device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetAlertSummary {
    pub alerts: Vec<Alert>,
    pub critical_count: usize,
    pub warning_count: usize,
    pub total_count: usize,
}

impl FleetAlertSummary {
    /// Order and count a flattened list of per-device alerts. The sort is
    /// stable, so alerts with equal severity and timestamp keep the order
    /// in which their devices were visited.
    pub fn from_alerts(mut alerts: Vec<Alert>) -> Self {
        alerts.sort_by(|a, b| {
            a.severity
                .rank()
                .cmp(&b.severity.rank())
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });

        let critical_count = alerts
            .iter()
            .filter(|a| a.severity == Severity::Critical)
            .count();
        let warning_count = alerts
            .iter()
            .filter(|a| a.severity == Severity::Warning)
            .count();
        let total_count = alerts.len();

        Self {
            alerts,
            critical_count,
            warning_count,
            total_count,
        }
    }

    pub fn empty() -> Self {
        Self::from_alerts(Vec::new())
    }
}
