use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tuning parameters of the steering and stopping controller.
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Proportional gain applied to the normalised lane angle.
    pub steering_gain: f64,
    /// The lane angle in degrees that maps to a 100% rudder before the gain.
    pub full_scale_angle: f64,
    /// Gain for left turns (positive angles).
    pub left_gain: f64,
    /// Gain for right turns (negative angles), compensating linkage asymmetry.
    pub right_gain: f64,
    /// Brake triggering is only armed once a zone entrance came closer than this.
    pub near_field_distance: f64,
    /// How far the entrance must recede past its closest reading to count as passed.
    pub recession_distance: f64,
    /// How long frames without a lane angle are tolerated before an emergency stop, in ms.
    pub no_signal_timeout_ms: u64,
    /// Minimum time between steering commands, in ms.
    pub command_interval_ms: u64,
    /// Minimum time between heartbeat messages, in ms.
    pub heartbeat_interval_ms: u64,
    /// Delay between passing a stopping zone and braking, in ms.
    pub brake_delay_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            steering_gain: 0.45,
            full_scale_angle: 60.0,
            left_gain: 1.0,
            right_gain: 1.3,
            near_field_distance: 100.0,
            recession_distance: 30.0,
            no_signal_timeout_ms: 1000,
            command_interval_ms: 100,
            heartbeat_interval_ms: 1000,
            brake_delay_ms: 1000,
        }
    }
}

impl ControllerConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that the values can drive the controller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("steering_gain", self.steering_gain),
            ("full_scale_angle", self.full_scale_angle),
            ("left_gain", self.left_gain),
            ("right_gain", self.right_gain),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("near_field_distance", self.near_field_distance),
            ("recession_distance", self.recession_distance),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    pub fn no_signal_timeout(&self) -> Duration {
        Duration::from_millis(self.no_signal_timeout_ms)
    }

    pub fn command_interval(&self) -> Duration {
        Duration::from_millis(self.command_interval_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn brake_delay(&self) -> Duration {
        Duration::from_millis(self.brake_delay_ms)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            ControllerConfig::from_json_str(r#"{ "right_gain": 1.5, "brake_delay_ms": 250 }"#)
                .unwrap();
        assert_eq!(config.right_gain, 1.5);
        assert_eq!(config.brake_delay(), Duration::from_millis(250));
        assert_eq!(config.steering_gain, 0.45);
        assert_eq!(config.command_interval(), Duration::from_millis(100));
    }

    #[test]
    fn rejects_bad_values() {
        let err = ControllerConfig::from_json_str(r#"{ "steering_gain": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ControllerConfig::from_json_str(r#"{ "recession_distance": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ControllerConfig::from_json_str(r#"{ "steering_gian": 0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn serializes_round_trip() {
        let config = ControllerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ControllerConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn missing_file() {
        let err = ControllerConfig::from_path("/nonexistent/lane-pilot.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
