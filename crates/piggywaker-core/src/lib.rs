//! # PiggyWaker Core Library
//!
//! This library provides the core logic of PiggyWaker, a guard that keeps a
//! person from dozing off: it watches accelerometer samples for prolonged
//! stillness and asks the host to vibrate, repeatedly, until they move again.
//!
//! ## Architecture
//!
//! - **Stillness Detector**: a pure state machine fed with samples and
//!   caller-supplied timestamps. No thread, no timer, no I/O.
//! - **Host glue**: traits for the sample source and the vibration actuator,
//!   gesture dispatch, and the display tick, all driven by explicit calls.
//! - **Simulation**: seeded synthetic accelerometer streams for reproducible
//!   runs without a device.
//!
//! ## Key Components
//!
//! - [`StillnessDetector`]: Core detector state machine
//! - [`WakeGuard`]: Detector wired to a [`SampleSource`] and an [`AlertActuator`]
//! - [`Config`]: TOML configuration
//! - [`Event`]: Every state change, serializable as tagged JSON

pub mod config;
pub mod detector;
pub mod error;
pub mod events;
pub mod host;
pub mod simulation;

pub use config::Config;
pub use detector::{DetectorParams, DetectorState, FilterState, Sample, SampleReading, StillnessDetector};
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use host::{AlertActuator, Gesture, HostInput, SampleSource, StatusDisplay, WakeGuard};
pub use simulation::{run_scenario, Scenario, SimulationReport};
