//! Text shown by a host on each display tick.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::detector::{DetectorState, StillnessDetector};

/// Everything a host screen shows, refreshed once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDisplay {
    /// Wall-clock time of day, `HH:MM:SS`.
    pub clock: String,
    pub state: DetectorState,
    /// Session time since start, `HH:MM:SS`; `None` unless running, in
    /// which case hosts keep showing the previous value.
    pub elapsed: Option<String>,
    /// Latest reading, e.g. `acc: 0.42 m/s²`; `None` when stopped.
    pub acceleration: Option<String>,
}

impl StatusDisplay {
    pub fn render<Tz: TimeZone>(detector: &StillnessDetector, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let acceleration = match detector.state() {
            DetectorState::Stopped => None,
            _ => Some(format_acceleration(detector.magnitude())),
        };
        Self {
            clock: now.format("%H:%M:%S").to_string(),
            state: detector.state(),
            elapsed: detector.session_elapsed_ms(now_ms).map(format_elapsed),
            acceleration,
        }
    }
}

/// `HH:MM:SS` of a duration. Hours wrap at 24.
pub fn format_elapsed(ms: u64) -> String {
    let total_secs = ms / 1000;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = (total_secs / 3600) % 24;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn format_acceleration(magnitude: f64) -> String {
    format!("acc: {magnitude:.2} m/s²")
}
