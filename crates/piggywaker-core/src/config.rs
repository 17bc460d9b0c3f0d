//! TOML-based configuration.
//!
//! Holds the detector constants, the alert pulse length and the defaults of
//! the simulation harness. Every field has a default, so an empty file (or no
//! file at all) yields the stock detector. Configuration is read-only: `set`
//! changes the in-memory copy and nothing is written back.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::detector::DetectorParams;
use crate::error::ConfigError;
use crate::host::DEFAULT_PULSE_MS;

/// Actuator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Length of one buzz in milliseconds.
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,
}

/// Defaults for synthetic runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Sample delivery rate.
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub detector: DetectorParams,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_pulse_ms() -> u64 {
    DEFAULT_PULSE_MS
}
// Roughly the rate of a "normal" phone sensor delay.
fn default_rate_hz() -> u32 {
    5
}
fn default_seed() -> u64 {
    42
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            pulse_ms: default_pulse_ms(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            seed: default_seed(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| ConfigError::invalid(key, e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    ConfigError::invalid(key, format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(ConfigError::invalid(
                                key,
                                format!("cannot parse '{value}' as number"),
                            ));
                        }
                    }
                    serde_json::Value::Object(_) => {
                        return Err(ConfigError::invalid(key, "is a section, not a value"));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema or if
    /// the resulting values fail validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the updated configuration is invalid. On error `self` is unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)
            .map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Apply `key=value` overrides in order.
    pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for item in overrides {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| ConfigError::invalid(item, "expected key=value"))?;
            self.set(key.trim(), value.trim())?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detector.validate()?;
        if self.alert.pulse_ms == 0 {
            return Err(ConfigError::invalid("alert.pulse_ms", "must be positive"));
        }
        crate::simulation::check_rate("simulation.rate_hz", self.simulation.rate_hz)?;
        Ok(())
    }
}
