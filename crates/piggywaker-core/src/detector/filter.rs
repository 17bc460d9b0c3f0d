//! Gravity separation.
//!
//! An exponential moving average tracks the slowly varying gravity component
//! per axis; whatever the average does not explain is linear acceleration.
//! O(1) per sample, no history buffer.

use serde::{Deserialize, Serialize};

/// Running gravity estimate, one component per axis, in m/s².
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    gravity: [f64; 3],
}

impl FilterState {
    /// A zeroed estimate, as used at the start of every session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gravity(&self) -> [f64; 3] {
        self.gravity
    }

    /// Fold one raw sample into the estimate and return the linear part.
    ///
    /// `g = alpha * g + (1 - alpha) * raw`, then `linear = raw - g`.
    pub fn update(&mut self, alpha: f64, raw: [f64; 3]) -> [f64; 3] {
        let mut linear = [0.0; 3];
        for axis in 0..3 {
            self.gravity[axis] = alpha * self.gravity[axis] + (1.0 - alpha) * raw[axis];
            linear[axis] = raw[axis] - self.gravity[axis];
        }
        linear
    }

    pub fn reset(&mut self) {
        self.gravity = [0.0; 3];
    }
}

/// Euclidean norm of a 3-vector.
pub fn magnitude(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_from_zero_keeps_most_of_the_sample() {
        let mut filter = FilterState::new();
        let linear = filter.update(0.8, [0.0, 0.0, 10.0]);
        assert!((filter.gravity()[2] - 2.0).abs() < 1e-12);
        assert!((linear[2] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn constant_input_converges_to_gravity() {
        let mut filter = FilterState::new();
        let mut linear = [0.0; 3];
        for _ in 0..200 {
            linear = filter.update(0.8, [0.0, 3.0, 9.0]);
        }
        assert!((filter.gravity()[1] - 3.0).abs() < 1e-9);
        assert!((filter.gravity()[2] - 9.0).abs() < 1e-9);
        assert!(magnitude(linear) < 1e-9);
    }

    #[test]
    fn reset_zeroes_every_axis() {
        let mut filter = FilterState::new();
        filter.update(0.8, [1.0, 2.0, 3.0]);
        filter.reset();
        assert_eq!(filter.gravity(), [0.0; 3]);
    }

    #[test]
    fn magnitude_is_euclidean() {
        assert_eq!(magnitude([3.0, 4.0, 0.0]), 5.0);
        assert!(magnitude([f64::NAN, 0.0, 0.0]).is_nan());
    }
}
