//! Core data types for the session facade.
//!
//! - [`Pose`]: rigid 3D transform with a 4x4 matrix adapter for callers
//! - [`ImuSample`]: raw inertial measurement (accelerometer + gyroscope)

mod imu;
mod pose;

pub use imu::ImuSample;
pub use pose::Pose;
