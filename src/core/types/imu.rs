//! Inertial measurement sample.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A single raw IMU measurement.
///
/// Passed through to the engine unfused; this crate only validates
/// ordering (non-decreasing within a sequence, none ahead of the frame
/// timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    /// Linear acceleration in m/s^2.
    pub accel: Vector3<f32>,
    /// Angular velocity in rad/s.
    pub gyro: Vector3<f32>,
    /// Sample time in seconds, same clock as frame timestamps.
    pub timestamp: f64,
}

impl ImuSample {
    /// Create a new sample.
    #[inline]
    pub fn new(accel: Vector3<f32>, gyro: Vector3<f32>, timestamp: f64) -> Self {
        Self {
            accel,
            gyro,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_fields() {
        let s = ImuSample::new(
            Vector3::new(0.0, 9.8, 0.0),
            Vector3::new(0.0, 0.0, 0.1),
            12345.678,
        );
        assert_eq!(s.accel.y, 9.8);
        assert_eq!(s.gyro.z, 0.1);
        assert_eq!(s.timestamp, 12345.678);
    }
}
