//! Deterministic simulation harness for the stillness detector.
//!
//! Generates synthetic accelerometer streams from a seed so detector behavior
//! can be reproduced without a device:
//! - Phase-based scenarios (still, moving, paused)
//! - Seeded sensor noise (`rand_pcg`)
//! - TOML scenario files and built-in presets

use std::f64::consts::TAU;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::detector::{Sample, StillnessDetector};
use crate::error::ConfigError;
use crate::host::{PulseLog, SourceSwitch, WakeGuard};

/// Standard gravity, placed on the z axis of every synthetic sample.
pub const EARTH_GRAVITY: f64 = 9.81;

/// Fastest sample rate; the clock only resolves whole milliseconds.
pub const MAX_RATE_HZ: u32 = 1_000;

/// Upper bound on `noise` and `amplitude`, in m/s².
pub const MAX_SIGNAL: f64 = 1e6;

/// Longest scenario accepted: one day.
pub const MAX_DURATION_MS: u64 = 24 * 60 * 60 * 1_000;

/// One stretch of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Phase {
    /// Lying still: gravity plus sensor noise.
    Still {
        duration_ms: u64,
        #[serde(default = "default_noise")]
        noise: f64,
    },
    /// Moving: a 1 Hz swing on x of the given amplitude, plus noise.
    Moving { duration_ms: u64, amplitude: f64 },
    /// Host paused the session; no samples are delivered.
    Paused { duration_ms: u64 },
}

fn default_noise() -> f64 {
    0.05
}

impl Phase {
    pub fn duration_ms(&self) -> u64 {
        match self {
            Phase::Still { duration_ms, .. }
            | Phase::Moving { duration_ms, .. }
            | Phase::Paused { duration_ms } => *duration_ms,
        }
    }
}

/// Simulation scenario definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Falls back to `simulation.seed` from the configuration.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Falls back to `simulation.rate_hz` from the configuration.
    #[serde(default)]
    pub rate_hz: Option<u32>,
    pub phases: Vec<Phase>,
}

impl Scenario {
    /// Three seconds of fidgeting, then falling asleep for twelve.
    pub fn nap() -> Self {
        Self {
            name: "nap".into(),
            seed: None,
            rate_hz: None,
            phases: vec![
                Phase::Moving {
                    duration_ms: 3_000,
                    amplitude: 3.0,
                },
                Phase::Still {
                    duration_ms: 12_000,
                    noise: default_noise(),
                },
            ],
        }
    }

    /// Short still stretches broken up by movement; never long enough to alert.
    pub fn restless() -> Self {
        let mut phases = Vec::new();
        for _ in 0..4 {
            phases.push(Phase::Moving {
                duration_ms: 2_000,
                amplitude: 3.0,
            });
            phases.push(Phase::Still {
                duration_ms: 3_000,
                noise: default_noise(),
            });
        }
        Self {
            name: "restless".into(),
            seed: None,
            rate_hz: None,
            phases,
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "nap" => Some(Self::nap()),
            "restless" => Some(Self::restless()),
            _ => None,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Saturates instead of overflowing; `validate` rejects such scenarios.
    pub fn total_duration_ms(&self) -> u64 {
        self.phases
            .iter()
            .map(Phase::duration_ms)
            .fold(0, u64::saturating_add)
    }

    /// Check rate, signal levels and total length.
    ///
    /// # Errors
    /// `InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(rate_hz) = self.rate_hz {
            check_rate("rate_hz", rate_hz)?;
        }

        let mut total_ms: u64 = 0;
        for (i, phase) in self.phases.iter().enumerate() {
            match *phase {
                Phase::Still { noise, .. } => {
                    check_signal(&format!("phases[{i}].noise"), noise)?;
                }
                Phase::Moving { amplitude, .. } => {
                    check_signal(&format!("phases[{i}].amplitude"), amplitude)?;
                }
                Phase::Paused { .. } => {}
            }
            total_ms = total_ms
                .checked_add(phase.duration_ms())
                .filter(|total| *total <= MAX_DURATION_MS)
                .ok_or_else(|| {
                    ConfigError::invalid(
                        &format!("phases[{i}].duration_ms"),
                        format!("scenario longer than {MAX_DURATION_MS} ms"),
                    )
                })?;
        }
        Ok(())
    }
}

pub(crate) fn check_rate(key: &str, rate_hz: u32) -> Result<(), ConfigError> {
    if rate_hz == 0 || rate_hz > MAX_RATE_HZ {
        return Err(ConfigError::invalid(
            key,
            format!("must be between 1 and {MAX_RATE_HZ}"),
        ));
    }
    Ok(())
}

fn check_signal(key: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=MAX_SIGNAL).contains(&value) {
        return Err(ConfigError::invalid(
            key,
            format!("must be between 0 and {MAX_SIGNAL}"),
        ));
    }
    Ok(())
}

/// Result of one simulated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub seed: u64,
    pub rate_hz: u32,
    pub duration_ms: u64,
    /// Samples the detector consumed.
    pub samples: u64,
    /// Timestamps of every alert.
    pub alerts_at_ms: Vec<u64>,
    /// Buzzes requested from the actuator.
    pub pulses: usize,
    pub peak_magnitude: f64,
}

/// Run a scenario through a fresh guard built from `config`.
///
/// # Errors
/// Returns `InvalidValue` if the scenario or the effective sample rate is out
/// of range.
pub fn run_scenario(
    scenario: &Scenario,
    config: &Config,
) -> Result<SimulationReport, ConfigError> {
    scenario.validate()?;
    let seed = scenario.seed.unwrap_or(config.simulation.seed);
    let rate_hz = scenario.rate_hz.unwrap_or(config.simulation.rate_hz);
    check_rate("rate_hz", rate_hz)?;
    let interval_ms = 1_000 / u64::from(rate_hz);
    let mut rng = Pcg64::seed_from_u64(seed);

    let mut guard = WakeGuard::new(
        StillnessDetector::new(config.detector),
        SourceSwitch::default(),
        PulseLog::default(),
    )
    .with_pulse_ms(config.alert.pulse_ms);

    let mut samples = 0;
    let mut alerts_at_ms = Vec::new();
    let mut peak_magnitude: f64 = 0.0;
    let mut now_ms = 0;

    guard.start(now_ms);
    for phase in &scenario.phases {
        let end_ms = now_ms + phase.duration_ms();
        if let Phase::Paused { .. } = phase {
            guard.pause();
            now_ms = end_ms;
            guard.resume(now_ms);
            continue;
        }
        while now_ms < end_ms {
            let sample = synthesize(phase, now_ms, &mut rng);
            let reading = guard.on_sample(sample);
            samples += 1;
            peak_magnitude = peak_magnitude.max(reading.magnitude);
            if reading.alert_fired {
                alerts_at_ms.push(now_ms);
            }
            now_ms += interval_ms;
        }
    }
    guard.stop();

    let (_, _, actuator) = guard.into_parts();
    tracing::debug!(
        scenario = %scenario.name,
        samples,
        alerts = alerts_at_ms.len(),
        "simulation finished"
    );

    Ok(SimulationReport {
        scenario: scenario.name.clone(),
        seed,
        rate_hz,
        duration_ms: scenario.total_duration_ms(),
        samples,
        alerts_at_ms,
        pulses: actuator.pulses.len(),
        peak_magnitude,
    })
}

fn synthesize(phase: &Phase, at_ms: u64, rng: &mut Pcg64) -> Sample {
    let (swing, noise) = match *phase {
        Phase::Still { noise, .. } => (0.0, noise),
        Phase::Moving { amplitude, .. } => {
            let t = at_ms as f64 / 1_000.0;
            (amplitude * (TAU * t).sin(), 0.1 * amplitude)
        }
        Phase::Paused { .. } => (0.0, 0.0),
    };
    let mut jitter = || {
        if noise > 0.0 {
            rng.gen_range(-noise..noise)
        } else {
            0.0
        }
    };
    Sample::new(
        swing + jitter(),
        jitter(),
        EARTH_GRAVITY + jitter(),
        at_ms,
    )
}
