/// Fixed alerting boundaries per metric. Built once at startup and handed
/// to the evaluator; never mutated afterwards.
///
/// All numeric comparisons against these values are strict, so a value
/// sitting exactly on a boundary is not flagged.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub heart_rate: HeartRateThresholds,
    pub spo2: Spo2Thresholds,
    pub body_temperature: BodyTemperatureThresholds,
    pub ambient_temperature: AmbientTemperatureThresholds,
}

/// Beats per minute. Normal range is [min, max]; above `critical` is an
/// immediate alarm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartRateThresholds {
    pub min: i32,
    pub max: i32,
    pub critical: i32,
}

/// Blood oxygen saturation, percent. Below `warning` is abnormal, below
/// `critical` is an immediate alarm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spo2Thresholds {
    pub warning: i32,
    pub critical: i32,
}

/// Skin temperature, degrees Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTemperatureThresholds {
    pub min: f64,
    pub max: f64,
    pub critical: f64,
}

/// Ambient (environment) temperature, degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientTemperatureThresholds {
    pub max: f64,
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            heart_rate: HeartRateThresholds {
                min: 60,
                max: 100,
                critical: 120,
            },
            spo2: Spo2Thresholds {
                warning: 90,
                critical: 85,
            },
            body_temperature: BodyTemperatureThresholds {
                min: 97.0,
                max: 99.0,
                critical: 101.0,
            },
            ambient_temperature: AmbientTemperatureThresholds {
                max: 35.0,
                critical: 40.0,
            },
        }
    }
}
