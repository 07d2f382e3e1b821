use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::thresholds::Thresholds;
use crate::models::Reading;

/// Ordinal classification of how far a metric deviates from its safe range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Alert,
    Normal,
    Unknown,
}

impl Severity {
    /// Sort rank used when merging alerts across the fleet; lower is more
    /// severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Alert => 2,
            Severity::Normal => 3,
            Severity::Unknown => 4,
        }
    }
}

/// Metric value captured at evaluation time, as it appears in the alert
/// payload: a number, a boolean, or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlertValue {
    Number(f64),
    Bool(bool),
}

/// One threshold violation on one metric of one reading. Alerts are derived
/// fresh on every evaluation pass and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub device_id: String,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub metric: String,
    pub value: Option<AlertValue>,
}

/// Evaluator output for a single device: the worst severity observed plus
/// every per-metric alert that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: Severity,
    pub alerts: Vec<Alert>,
}

/// Pure classifier from a reading to a health status. Stateless apart from
/// the threshold table injected at construction, so evaluating the same
/// reading twice always yields the same output.
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    thresholds: Thresholds,
}

impl AlertEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Classify one reading. An absent reading means the device has never
    /// reported; that is not an error and yields `Unknown` with no alerts.
    pub fn evaluate(&self, reading: Option<&Reading>) -> HealthStatus {
        let Some(reading) = reading else {
            return HealthStatus {
                status: Severity::Unknown,
                alerts: Vec::new(),
            };
        };

        let alerts = self.check_reading(reading);
        let status = alerts
            .iter()
            .map(|a| a.severity)
            .min_by_key(|s| s.rank())
            .unwrap_or(Severity::Normal);

        HealthStatus { status, alerts }
    }

    /// Per-metric checks. Each metric contributes at most one alert; the
    /// critical check runs before the warning check, so a value that is
    /// both out of range and over the critical threshold reports once, as
    /// critical. Absent metric values are skipped entirely.
    fn check_reading(&self, reading: &Reading) -> Vec<Alert> {
        let t = &self.thresholds;
        let mut alerts = Vec::new();

        let mut push = |severity: Severity, metric: &str, message: &str, value: AlertValue| {
            alerts.push(Alert {
                device_id: reading.device_id.clone(),
                severity,
                message: message.to_string(),
                timestamp: reading.timestamp,
                metric: metric.to_string(),
                value: Some(value),
            });
        };

        if let Some(bpm) = reading.heart_bpm {
            if bpm > t.heart_rate.critical {
                push(
                    Severity::Critical,
                    "Heart Rate",
                    "Heart rate dangerously high",
                    AlertValue::Number(bpm.into()),
                );
            } else if bpm < t.heart_rate.min || bpm > t.heart_rate.max {
                push(
                    Severity::Warning,
                    "Heart Rate",
                    "Heart rate abnormal",
                    AlertValue::Number(bpm.into()),
                );
            }
        }

        if let Some(spo2) = reading.spo2_pct {
            if spo2 < t.spo2.critical {
                push(
                    Severity::Critical,
                    "SpO2",
                    "Low oxygen saturation",
                    AlertValue::Number(spo2.into()),
                );
            } else if spo2 < t.spo2.warning {
                push(
                    Severity::Warning,
                    "SpO2",
                    "Oxygen saturation below normal",
                    AlertValue::Number(spo2.into()),
                );
            }
        }

        if let Some(temp) = reading.skin_temp_f {
            if temp > t.body_temperature.critical {
                push(
                    Severity::Critical,
                    "Body Temperature",
                    "High fever detected",
                    AlertValue::Number(temp),
                );
            } else if temp < t.body_temperature.min || temp > t.body_temperature.max {
                push(
                    Severity::Warning,
                    "Body Temperature",
                    "Body temperature abnormal",
                    AlertValue::Number(temp),
                );
            }
        }

        if let Some(temp) = reading.env_temp_c {
            if temp > t.ambient_temperature.critical {
                push(
                    Severity::Critical,
                    "Ambient Temperature",
                    "Dangerous ambient temperature",
                    AlertValue::Number(temp),
                );
            } else if temp > t.ambient_temperature.max {
                push(
                    Severity::Warning,
                    "Ambient Temperature",
                    "High ambient temperature",
                    AlertValue::Number(temp),
                );
            }
        }

        // An open flame underground is an immediate hazard: always critical.
        if reading.flame == Some(true) {
            push(
                Severity::Critical,
                "Flame Sensor",
                "Flame detected",
                AlertValue::Bool(true),
            );
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn normal_reading() -> Reading {
        Reading {
            id: 1,
            device_id: "helmet-001".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            heart_bpm: Some(75),
            spo2_pct: Some(98),
            skin_temp_f: Some(98.2),
            env_temp_c: Some(24.0),
            flame: Some(false),
            light_raw: Some(512),
            distance_cm: Some(120),
            aux_raw: Some(0),
        }
    }

    fn evaluator() -> AlertEvaluator {
        AlertEvaluator::new(Thresholds::default())
    }

    #[test]
    fn normal_reading_yields_no_alerts() {
        let status = evaluator().evaluate(Some(&normal_reading()));
        assert_eq!(status.status, Severity::Normal);
        assert!(status.alerts.is_empty());
    }

    #[test]
    fn absent_reading_is_unknown() {
        let status = evaluator().evaluate(None);
        assert_eq!(status.status, Severity::Unknown);
        assert!(status.alerts.is_empty());
    }

    #[test]
    fn heart_rate_121_is_critical() {
        let mut reading = normal_reading();
        reading.heart_bpm = Some(121);

        let status = evaluator().evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Critical);
        assert_eq!(status.alerts.len(), 1);
        assert_eq!(status.alerts[0].metric, "Heart Rate");
        assert_eq!(status.alerts[0].message, "Heart rate dangerously high");
        assert_eq!(status.alerts[0].value, Some(AlertValue::Number(121.0)));
    }

    #[test]
    fn heart_rate_boundaries_are_exclusive() {
        let eval = evaluator();

        for bpm in [60, 100, 120] {
            let mut reading = normal_reading();
            reading.heart_bpm = Some(bpm);
            let status = eval.evaluate(Some(&reading));
            // 120 is above the normal range but not above critical
            if bpm == 120 {
                assert_eq!(status.status, Severity::Warning, "bpm={}", bpm);
            } else {
                assert_eq!(status.status, Severity::Normal, "bpm={}", bpm);
            }
        }
    }

    #[test]
    fn heart_rate_out_of_range_is_warning() {
        let eval = evaluator();

        for bpm in [59, 101] {
            let mut reading = normal_reading();
            reading.heart_bpm = Some(bpm);
            let status = eval.evaluate(Some(&reading));
            assert_eq!(status.status, Severity::Warning, "bpm={}", bpm);
            assert_eq!(status.alerts[0].message, "Heart rate abnormal");
        }
    }

    #[test]
    fn critical_heart_rate_produces_single_alert() {
        // 130 is both out of the normal range and over the critical
        // threshold; only the critical alert may be emitted.
        let mut reading = normal_reading();
        reading.heart_bpm = Some(130);

        let status = evaluator().evaluate(Some(&reading));
        assert_eq!(status.alerts.len(), 1);
        assert_eq!(status.alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn spo2_tiers() {
        let eval = evaluator();

        let mut reading = normal_reading();
        reading.spo2_pct = Some(84);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Critical);
        assert_eq!(status.alerts[0].message, "Low oxygen saturation");

        reading.spo2_pct = Some(89);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Warning);
        assert_eq!(status.alerts[0].message, "Oxygen saturation below normal");

        reading.spo2_pct = Some(90);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Normal);
        assert!(status.alerts.is_empty());
    }

    #[test]
    fn spo2_85_is_warning_not_critical() {
        let mut reading = normal_reading();
        reading.spo2_pct = Some(85);

        let status = evaluator().evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Warning);
    }

    #[test]
    fn body_temperature_tiers() {
        let eval = evaluator();

        let mut reading = normal_reading();
        reading.skin_temp_f = Some(101.5);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Critical);
        assert_eq!(status.alerts[0].message, "High fever detected");

        // Exactly 101 is not over the critical threshold, but it is still
        // outside the normal range.
        reading.skin_temp_f = Some(101.0);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Warning);
        assert_eq!(status.alerts[0].message, "Body temperature abnormal");

        reading.skin_temp_f = Some(96.5);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Warning);

        reading.skin_temp_f = Some(98.6);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Normal);
    }

    #[test]
    fn ambient_temperature_tiers() {
        let eval = evaluator();

        let mut reading = normal_reading();
        reading.env_temp_c = Some(40.5);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Critical);
        assert_eq!(status.alerts[0].message, "Dangerous ambient temperature");

        reading.env_temp_c = Some(40.0);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Warning);
        assert_eq!(status.alerts[0].message, "High ambient temperature");

        reading.env_temp_c = Some(35.0);
        let status = eval.evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Normal);
    }

    #[test]
    fn flame_is_critical() {
        let mut reading = normal_reading();
        reading.flame = Some(true);

        let status = evaluator().evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Critical);
        assert_eq!(status.alerts.len(), 1);
        assert_eq!(status.alerts[0].metric, "Flame Sensor");
        assert_eq!(status.alerts[0].message, "Flame detected");
        assert_eq!(status.alerts[0].value, Some(AlertValue::Bool(true)));
    }

    #[test]
    fn missing_metrics_never_alert() {
        let reading = Reading {
            heart_bpm: None,
            spo2_pct: None,
            skin_temp_f: None,
            env_temp_c: None,
            flame: None,
            ..normal_reading()
        };

        let status = evaluator().evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Normal);
        assert!(status.alerts.is_empty());
    }

    #[test]
    fn multiple_critical_metrics_all_reported() {
        let mut reading = normal_reading();
        reading.heart_bpm = Some(150);
        reading.spo2_pct = Some(80);

        let status = evaluator().evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Critical);
        assert_eq!(status.alerts.len(), 2);
        assert!(status
            .alerts
            .iter()
            .all(|a| a.severity == Severity::Critical));

        let metrics: Vec<&str> = status.alerts.iter().map(|a| a.metric.as_str()).collect();
        assert_eq!(metrics, vec!["Heart Rate", "SpO2"]);
    }

    #[test]
    fn warning_does_not_mask_critical_status() {
        let mut reading = normal_reading();
        reading.heart_bpm = Some(105); // warning
        reading.spo2_pct = Some(80); // critical

        let status = evaluator().evaluate(Some(&reading));
        assert_eq!(status.status, Severity::Critical);
        assert_eq!(status.alerts.len(), 2);
    }

    #[test]
    fn evaluate_is_idempotent() {
        let mut reading = normal_reading();
        reading.heart_bpm = Some(150);
        reading.flame = Some(true);

        let eval = evaluator();
        let first = eval.evaluate(Some(&reading));
        let second = eval.evaluate(Some(&reading));
        assert_eq!(first, second);
    }

    #[test]
    fn alerts_carry_source_timestamp_and_device() {
        let mut reading = normal_reading();
        reading.heart_bpm = Some(150);

        let status = evaluator().evaluate(Some(&reading));
        assert_eq!(status.alerts[0].device_id, reading.device_id);
        assert_eq!(status.alerts[0].timestamp, reading.timestamp);
    }
}
