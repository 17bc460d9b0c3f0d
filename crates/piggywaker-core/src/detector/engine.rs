//! Stillness detector implementation.
//!
//! The detector is a wall-clock-based state machine. It owns no thread and
//! no timer: the host feeds it samples and timestamps and it answers with a
//! magnitude reading and, occasionally, an alert.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start--> Running --pause--> Paused --resume--> Running
//! Running | Paused --stop--> Stopped
//! ```
//!
//! ## Usage
//!
//! ```
//! use piggywaker_core::StillnessDetector;
//!
//! let mut detector = StillnessDetector::default();
//! detector.start(0);
//! let reading = detector.on_sample([0.0, 0.0, 9.8], 20);
//! assert!(!reading.alert_fired);
//! ```

use serde::{Deserialize, Serialize};

use super::filter::{magnitude, FilterState};
use super::params::DetectorParams;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorState {
    Stopped,
    Running,
    Paused,
}

impl DetectorState {
    pub fn label(self) -> &'static str {
        match self {
            DetectorState::Stopped => "stopped",
            DetectorState::Running => "running",
            DetectorState::Paused => "paused",
        }
    }
}

/// Outcome of one `on_sample` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleReading {
    /// Linear acceleration magnitude in m/s², for display.
    pub magnitude: f64,
    /// Whether the actuator should buzz for this sample.
    pub alert_fired: bool,
}

impl SampleReading {
    const IGNORED: SampleReading = SampleReading {
        magnitude: 0.0,
        alert_fired: false,
    };
}

/// Core stillness detector.
///
/// Operates on caller-supplied millisecond timestamps -- no internal clock.
#[derive(Debug, Clone)]
pub struct StillnessDetector {
    params: DetectorParams,
    state: DetectorState,
    filter: FilterState,
    /// Start of the current below-threshold interval.
    reference_ms: u64,
    /// Set by `start`, untouched by `resume`. Drives the elapsed display.
    session_started_ms: u64,
    /// Last computed magnitude of the session.
    magnitude: f64,
    alerts_fired: u64,
}

impl Default for StillnessDetector {
    fn default() -> Self {
        Self::new(DetectorParams::default())
    }
}

impl StillnessDetector {
    /// Create a stopped detector. Parameters are taken as given; validate
    /// them first when they come from user input.
    pub fn new(params: DetectorParams) -> Self {
        Self {
            params,
            state: DetectorState::Stopped,
            filter: FilterState::new(),
            reference_ms: 0,
            session_started_ms: 0,
            magnitude: 0.0,
            alerts_fired: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DetectorState::Running
    }

    pub fn gravity(&self) -> [f64; 3] {
        self.filter.gravity()
    }

    pub fn reference_ms(&self) -> u64 {
        self.reference_ms
    }

    /// Most recent magnitude, or 0 before the first sample of a session.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn alerts_fired(&self) -> u64 {
        self.alerts_fired
    }

    /// Time since the stillness reference. Zero when stopped or when `now`
    /// lies before the reference.
    pub fn still_for_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            DetectorState::Stopped => 0,
            _ => now_ms.saturating_sub(self.reference_ms),
        }
    }

    /// Elapsed session time for display, only while running.
    ///
    /// Measured from `start`, so time spent paused is included.
    pub fn session_elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        match self.state {
            DetectorState::Running => Some(now_ms.saturating_sub(self.session_started_ms)),
            _ => None,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        Event::StateSnapshot {
            state: self.state,
            magnitude: self.magnitude,
            still_for_ms: self.still_for_ms(now_ms),
            session_elapsed_ms: self.session_elapsed_ms(now_ms),
            alerts_fired: self.alerts_fired,
            at_ms: now_ms,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm the detector. Re-arms from scratch when already running or paused.
    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        self.filter.reset();
        self.reference_ms = now_ms;
        self.session_started_ms = now_ms;
        self.magnitude = 0.0;
        self.alerts_fired = 0;
        self.state = DetectorState::Running;
        tracing::debug!(at_ms = now_ms, "stillness detector started");
        Some(Event::DetectorStarted { at_ms: now_ms })
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            DetectorState::Running => {
                self.state = DetectorState::Paused;
                tracing::debug!(reference_ms = self.reference_ms, "stillness detector paused");
                Some(Event::DetectorPaused {
                    reference_ms: self.reference_ms,
                    alerts_fired: self.alerts_fired,
                })
            }
            _ => None,
        }
    }

    /// Leave the pause. The stillness clock restarts at `now_ms`; the gravity
    /// estimate carries over.
    pub fn resume(&mut self, now_ms: u64) -> Option<Event> {
        match self.state {
            DetectorState::Paused => {
                self.state = DetectorState::Running;
                self.reference_ms = now_ms;
                tracing::debug!(at_ms = now_ms, "stillness detector resumed");
                Some(Event::DetectorResumed { at_ms: now_ms })
            }
            _ => None,
        }
    }

    pub fn stop(&mut self) -> Option<Event> {
        match self.state {
            DetectorState::Running | DetectorState::Paused => {
                let alerts_fired = self.alerts_fired;
                self.state = DetectorState::Stopped;
                self.filter.reset();
                self.reference_ms = 0;
                self.magnitude = 0.0;
                tracing::debug!(alerts_fired, "stillness detector stopped");
                Some(Event::DetectorStopped { alerts_fired })
            }
            DetectorState::Stopped => None,
        }
    }

    /// Process one accelerometer sample taken at `now_ms`.
    ///
    /// Ignored (zero magnitude, no alert, no state change) unless running.
    pub fn on_sample(&mut self, raw: [f64; 3], now_ms: u64) -> SampleReading {
        self.ingest(raw, now_ms).0
    }

    /// Like [`on_sample`](Self::on_sample), also returning the
    /// `StillnessAlert` event when one fires.
    pub fn ingest(&mut self, raw: [f64; 3], now_ms: u64) -> (SampleReading, Option<Event>) {
        if self.state != DetectorState::Running {
            return (SampleReading::IGNORED, None);
        }

        let linear = self.filter.update(self.params.alpha, raw);
        let magnitude = magnitude(linear);
        self.magnitude = magnitude;
        tracing::trace!(magnitude, at_ms = now_ms, "sample");

        let quiet = SampleReading {
            magnitude,
            alert_fired: false,
        };

        // NaN fails this comparison and counts as motion.
        let still = magnitude < self.params.threshold;
        if !still {
            self.reference_ms = now_ms;
            return (quiet, None);
        }

        let still_for_ms = now_ms.saturating_sub(self.reference_ms);
        if still_for_ms <= self.params.stillness_ms {
            return (quiet, None);
        }

        // Advance by a fixed step rather than to `now`: repeats come every
        // `alert_step_ms` of continued stillness.
        self.reference_ms = self.reference_ms.saturating_add(self.params.alert_step_ms);
        self.alerts_fired += 1;
        tracing::info!(
            at_ms = now_ms,
            still_for_ms,
            alert_index = self.alerts_fired,
            "stillness alert"
        );
        (
            SampleReading {
                magnitude,
                alert_fired: true,
            },
            Some(Event::StillnessAlert {
                at_ms: now_ms,
                still_for_ms,
                magnitude,
                alert_index: self.alerts_fired,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAVITY: [f64; 3] = [0.0, 0.0, 9.8];

    /// Feed pure gravity at `at_ms` until the filter has settled.
    fn settle(detector: &mut StillnessDetector, at_ms: u64) {
        for _ in 0..200 {
            detector.on_sample(GRAVITY, at_ms);
        }
    }

    #[test]
    fn start_pause_resume_stop() {
        let mut detector = StillnessDetector::default();
        assert_eq!(detector.state(), DetectorState::Stopped);

        assert!(detector.start(0).is_some());
        assert_eq!(detector.state(), DetectorState::Running);

        assert!(detector.pause().is_some());
        assert_eq!(detector.state(), DetectorState::Paused);

        assert!(detector.resume(10).is_some());
        assert_eq!(detector.state(), DetectorState::Running);

        assert!(detector.stop().is_some());
        assert_eq!(detector.state(), DetectorState::Stopped);
    }

    #[test]
    fn commands_outside_their_state_are_noops() {
        let mut detector = StillnessDetector::default();
        assert!(detector.pause().is_none());
        assert!(detector.resume(5).is_none());
        assert!(detector.stop().is_none());

        detector.start(0);
        assert!(detector.resume(5).is_none());
        assert_eq!(detector.reference_ms(), 0);
    }

    #[test]
    fn first_sample_is_a_transient() {
        let mut detector = StillnessDetector::default();
        detector.start(0);
        // Filter climbs from zero, so gravity looks like motion at first.
        let reading = detector.on_sample(GRAVITY, 1);
        assert!((reading.magnitude - 9.8 * 0.8).abs() < 1e-9);
        assert!(!reading.alert_fired);
        assert_eq!(detector.reference_ms(), 1);
    }

    #[test]
    fn alert_fires_after_strictly_more_than_window() {
        let mut detector = StillnessDetector::default();
        detector.start(0);
        settle(&mut detector, 0);
        assert_eq!(detector.reference_ms(), 0);

        assert!(!detector.on_sample(GRAVITY, 5_000).alert_fired);
        let reading = detector.on_sample(GRAVITY, 5_001);
        assert!(reading.alert_fired);
        assert!(reading.magnitude < 1e-6);
        assert_eq!(detector.reference_ms(), 250);
        assert_eq!(detector.alerts_fired(), 1);
    }

    #[test]
    fn ingest_reports_alert_event() {
        let mut detector = StillnessDetector::default();
        detector.start(100);
        settle(&mut detector, 100);
        let (_, event) = detector.ingest(GRAVITY, 5_200);
        match event {
            Some(Event::StillnessAlert {
                at_ms,
                still_for_ms,
                alert_index,
                ..
            }) => {
                assert_eq!(at_ms, 5_200);
                assert_eq!(still_for_ms, 5_100);
                assert_eq!(alert_index, 1);
            }
            other => panic!("Expected StillnessAlert, got {other:?}"),
        }
    }

    #[test]
    fn samples_ignored_unless_running() {
        let mut detector = StillnessDetector::default();
        let reading = detector.on_sample([5.0, 5.0, 5.0], 10);
        assert_eq!(reading, SampleReading::IGNORED);
        assert_eq!(detector.gravity(), [0.0; 3]);

        detector.start(0);
        detector.on_sample(GRAVITY, 1);
        let frozen = detector.gravity();
        detector.pause();
        let reading = detector.on_sample([50.0, 0.0, 0.0], 2);
        assert_eq!(reading, SampleReading::IGNORED);
        assert_eq!(detector.gravity(), frozen);
        assert_eq!(detector.reference_ms(), 1);
    }

    #[test]
    fn nan_sample_counts_as_motion() {
        let mut detector = StillnessDetector::default();
        detector.start(0);
        settle(&mut detector, 0);
        let reading = detector.on_sample([f64::NAN, 0.0, 9.8], 6_000);
        assert!(reading.magnitude.is_nan());
        assert!(!reading.alert_fired);
        assert_eq!(detector.reference_ms(), 6_000);
    }

    #[test]
    fn timestamps_before_reference_never_alert() {
        let mut detector = StillnessDetector::default();
        detector.start(10_000);
        settle(&mut detector, 10_000);
        assert!(!detector.on_sample(GRAVITY, 2_000).alert_fired);
        assert_eq!(detector.still_for_ms(2_000), 0);
    }

    #[test]
    fn session_elapsed_spans_pauses_and_hides_while_paused() {
        let mut detector = StillnessDetector::default();
        detector.start(1_000);
        assert_eq!(detector.session_elapsed_ms(4_000), Some(3_000));
        detector.pause();
        assert_eq!(detector.session_elapsed_ms(5_000), None);
        detector.resume(9_000);
        assert_eq!(detector.session_elapsed_ms(10_000), Some(9_000));
        detector.stop();
        assert_eq!(detector.session_elapsed_ms(11_000), None);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let mut detector = StillnessDetector::default();
        detector.start(0);
        match detector.snapshot(1_500) {
            Event::StateSnapshot {
                state,
                still_for_ms,
                session_elapsed_ms,
                alerts_fired,
                ..
            } => {
                assert_eq!(state, DetectorState::Running);
                assert_eq!(still_for_ms, 1_500);
                assert_eq!(session_elapsed_ms, Some(1_500));
                assert_eq!(alerts_fired, 0);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn custom_params_change_the_cadence() {
        let params = DetectorParams {
            stillness_ms: 1_000,
            alert_step_ms: 100,
            ..Default::default()
        };
        let mut detector = StillnessDetector::new(params);
        detector.start(0);
        settle(&mut detector, 0);
        assert!(detector.on_sample(GRAVITY, 1_001).alert_fired);
        assert!(!detector.on_sample(GRAVITY, 1_100).alert_fired);
        assert!(detector.on_sample(GRAVITY, 1_101).alert_fired);
    }
}
