mod engine;
mod filter;
mod params;
mod sample;

pub use engine::{DetectorState, SampleReading, StillnessDetector};
pub use filter::{magnitude, FilterState};
pub use params::{DetectorParams, ALERT_STEP_MS, ALPHA, STILLNESS_MS, THRESHOLD};
pub use sample::Sample;
