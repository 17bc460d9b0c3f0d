use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smoothing factor of the gravity estimate.
pub const ALPHA: f64 = 0.8;
/// Linear acceleration (m/s²) at or above which the wearer counts as moving.
pub const THRESHOLD: f64 = 1.0;
/// Stillness that must elapse before the first alert.
pub const STILLNESS_MS: u64 = 5_000;
/// Amount the stillness reference advances after each alert.
pub const ALERT_STEP_MS: u64 = 250;

/// Tunable constants of the stillness detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Motion threshold in m/s².
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_stillness_ms")]
    pub stillness_ms: u64,
    #[serde(default = "default_alert_step_ms")]
    pub alert_step_ms: u64,
}

fn default_alpha() -> f64 {
    ALPHA
}
fn default_threshold() -> f64 {
    THRESHOLD
}
fn default_stillness_ms() -> u64 {
    STILLNESS_MS
}
fn default_alert_step_ms() -> u64 {
    ALERT_STEP_MS
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            alpha: ALPHA,
            threshold: THRESHOLD,
            stillness_ms: STILLNESS_MS,
            alert_step_ms: ALERT_STEP_MS,
        }
    }
}

impl DetectorParams {
    /// Check that the parameters describe a usable detector.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.alpha) {
            return Err(ConfigError::invalid(
                "detector.alpha",
                format!("{} is outside [0, 1)", self.alpha),
            ));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::invalid(
                "detector.threshold",
                format!("{} is not a finite non-negative value", self.threshold),
            ));
        }
        if self.alert_step_ms == 0 {
            return Err(ConfigError::invalid(
                "detector.alert_step_ms",
                "must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let params = DetectorParams::default();
        assert_eq!(params.alpha, 0.8);
        assert_eq!(params.threshold, 1.0);
        assert_eq!(params.stillness_ms, 5_000);
        assert_eq!(params.alert_step_ms, 250);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_alpha_of_one() {
        let params = DetectorParams {
            alpha: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "detector.alpha"
        ));
    }

    #[test]
    fn rejects_nan_threshold_and_zero_step() {
        let nan = DetectorParams {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let zero_step = DetectorParams {
            alert_step_ms: 0,
            ..Default::default()
        };
        assert!(zero_step.validate().is_err());
    }
}
