//! Host-side wiring of the detector to its collaborators.
//!
//! `WakeGuard` is what a host screen holds: it forwards lifecycle commands and
//! samples to the detector, keeps the sample subscription in step with the
//! detector state, and buzzes the actuator on every alert. It owns no loop;
//! the host calls in from its single event context.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::display::StatusDisplay;
use super::input::HostInput;
use super::traits::{AlertActuator, SampleSource};
use crate::detector::{DetectorState, Sample, SampleReading, StillnessDetector};
use crate::events::Event;

/// Default length of one buzz.
pub const DEFAULT_PULSE_MS: u64 = 250;

/// Touch gestures the host recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// Start when stopped, otherwise toggle pause.
    DoubleTap,
    /// Stop a running or paused session.
    LongPress,
}

/// What one host input produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Present for samples the detector consumed.
    pub reading: Option<SampleReading>,
    pub event: Option<Event>,
}

pub struct WakeGuard<S, A> {
    detector: StillnessDetector,
    source: S,
    actuator: A,
    pulse_ms: u64,
    foreground: bool,
    source_enabled: bool,
}

impl<S: SampleSource, A: AlertActuator> WakeGuard<S, A> {
    /// Wrap a detector. The host starts out in the foreground.
    pub fn new(detector: StillnessDetector, source: S, actuator: A) -> Self {
        Self {
            detector,
            source,
            actuator,
            pulse_ms: DEFAULT_PULSE_MS,
            foreground: true,
            source_enabled: false,
        }
    }

    pub fn with_pulse_ms(mut self, pulse_ms: u64) -> Self {
        self.pulse_ms = pulse_ms;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn detector(&self) -> &StillnessDetector {
        &self.detector
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    pub fn into_parts(self) -> (StillnessDetector, S, A) {
        (self.detector, self.source, self.actuator)
    }

    /// Refresh the host display.
    pub fn tick<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> StatusDisplay
    where
        Tz::Offset: std::fmt::Display,
    {
        StatusDisplay::render(&self.detector, now)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.detector.start(now_ms);
        self.sync_source();
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.detector.pause();
        self.sync_source();
        event
    }

    pub fn resume(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.detector.resume(now_ms);
        self.sync_source();
        event
    }

    pub fn stop(&mut self) -> Option<Event> {
        let event = self.detector.stop();
        self.sync_source();
        event
    }

    pub fn on_gesture(&mut self, gesture: Gesture, now_ms: u64) -> Option<Event> {
        tracing::debug!(?gesture, state = self.detector.state().label(), "gesture");
        match (gesture, self.detector.state()) {
            (Gesture::DoubleTap, DetectorState::Stopped) => self.start(now_ms),
            (Gesture::DoubleTap, DetectorState::Running) => self.pause(),
            (Gesture::DoubleTap, DetectorState::Paused) => self.resume(now_ms),
            (Gesture::LongPress, DetectorState::Stopped) => None,
            (Gesture::LongPress, _) => self.stop(),
        }
    }

    /// The host screen went away. Detector state is kept; the subscription
    /// is dropped until the host returns.
    pub fn enter_background(&mut self) {
        self.foreground = false;
        self.sync_source();
    }

    pub fn enter_foreground(&mut self) {
        self.foreground = true;
        self.sync_source();
    }

    /// Deliver one sample. Samples arriving while the subscription is off
    /// are dropped.
    pub fn on_sample(&mut self, sample: Sample) -> SampleReading {
        match self.feed(sample) {
            Some((reading, _)) => reading,
            None => SampleReading {
                magnitude: 0.0,
                alert_fired: false,
            },
        }
    }

    pub fn apply(&mut self, input: HostInput) -> Outcome {
        match input {
            HostInput::Sample(sample) => match self.feed(sample) {
                Some((reading, event)) => Outcome {
                    reading: Some(reading),
                    event,
                },
                None => Outcome::default(),
            },
            HostInput::Start { at_ms } => self.start(at_ms).into(),
            HostInput::Pause => self.pause().into(),
            HostInput::Resume { at_ms } => self.resume(at_ms).into(),
            HostInput::Stop => self.stop().into(),
            HostInput::Gesture { gesture, at_ms } => self.on_gesture(gesture, at_ms).into(),
            HostInput::Background => {
                self.enter_background();
                Outcome::default()
            }
            HostInput::Foreground => {
                self.enter_foreground();
                Outcome::default()
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn feed(&mut self, sample: Sample) -> Option<(SampleReading, Option<Event>)> {
        if !self.source_enabled {
            tracing::trace!(at_ms = sample.at_ms, "sample dropped, source disabled");
            return None;
        }
        let (reading, event) = self.detector.ingest(sample.vector(), sample.at_ms);
        if reading.alert_fired {
            self.actuator.buzz(self.pulse_ms);
        }
        Some((reading, event))
    }

    fn sync_source(&mut self) {
        let wanted = self.foreground && self.detector.is_running();
        if wanted == self.source_enabled {
            return;
        }
        if wanted {
            self.source.enable();
        } else {
            self.source.disable();
        }
        self.source_enabled = wanted;
        tracing::debug!(enabled = wanted, "sample source switched");
    }
}

impl From<Option<Event>> for Outcome {
    fn from(event: Option<Event>) -> Self {
        Outcome {
            reading: None,
            event,
        }
    }
}
