//! Error types for the session facade.

use thiserror::Error;

use crate::engine::{EngineError, SensorMode};

pub type Result<T> = std::result::Result<T, SessionError>;

/// Session error taxonomy.
///
/// The first three variants are caller errors and are reported
/// synchronously without touching the engine. `Engine` wraps a failure
/// reported by the underlying SLAM engine; during ingestion it additionally
/// degrades the cached tracking state to `Lost` while keeping the session
/// alive.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Lifecycle misuse: ingestion or telemetry before `initialize()` or
    /// after `shutdown()`, double-initialize, viewer flag change while
    /// running.
    #[error("invalid session state: {0}")]
    InvalidState(&'static str),

    /// Ingestion entry point does not match the configured sensor mode.
    #[error("sensor mode mismatch: session is {configured}, call requires {requested}")]
    InvalidSensorMode {
        configured: SensorMode,
        requested: SensorMode,
    },

    /// Malformed per-frame input: mismatched image dimensions,
    /// non-increasing timestamp, out-of-order IMU sequence.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unrecoverable failure reported by the underlying engine.
    #[error("engine failure: {0}")]
    Engine(String),
}

impl From<EngineError> for SessionError {
    fn from(e: EngineError) -> Self {
        SessionError::Engine(e.to_string())
    }
}
