use serde::{Deserialize, Serialize};

/// One accelerometer delivery: acceleration per axis in m/s² and the time it
/// was taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub at_ms: u64,
}

impl Sample {
    pub fn new(x: f64, y: f64, z: f64, at_ms: u64) -> Self {
        Self { x, y, z, at_ms }
    }

    pub fn vector(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}
