//! Session lifecycle and exclusive ownership of the engine instance.
//!
//! A [`Session`] owns at most one engine at a time. The engine lives
//! exactly between a successful [`Session::initialize`] and the matching
//! [`Session::shutdown`] (or drop); no other component ever holds a
//! reference to it. All mutating operations take `&mut self`, which makes
//! overlapping ingestion calls unrepresentable.

mod ingest;
mod telemetry;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::types::Pose;
use crate::engine::{EngineFactory, SensorMode, SlamEngine, TrackingState};
use crate::error::{Result, SessionError};
use crate::mapping::{OccupancyProjector, OccupancyProjectorConfig};

/// Session configuration.
///
/// Vocabulary and settings files are opaque configuration handed to the
/// engine unchanged; the facade never parses them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Vocabulary file passed through to the engine.
    pub vocabulary_file: PathBuf,

    /// Settings file passed through to the engine.
    pub settings_file: PathBuf,

    /// Sensor configuration, fixed for the session's lifetime.
    pub sensor_mode: SensorMode,

    /// Whether the engine should open its viewer. Only changeable before
    /// `initialize()`.
    #[serde(default)]
    pub use_viewer: bool,

    /// Occupancy projection parameters.
    #[serde(default)]
    pub occupancy: OccupancyProjectorConfig,
}

/// Stateful facade over a visual/inertial SLAM engine.
pub struct Session {
    config: SessionConfig,
    factory: Box<dyn EngineFactory>,
    projector: OccupancyProjector,

    /// The engine instance. `Some` exactly while the session is running.
    engine: Option<Box<dyn SlamEngine>>,

    /// Tracking state cached after the last ingestion call. Accessors read
    /// this snapshot and never re-query the engine.
    snapshot: TrackingState,

    /// Pose from the most recent ingestion whose state was `Ok`.
    current_pose: Option<Pose>,

    /// Append-only pose history, one entry per `Ok` ingestion.
    trajectory: Vec<Pose>,

    /// Timestamp of the last accepted frame; ingestion timestamps must
    /// strictly increase for the whole engine lifetime.
    last_timestamp: Option<f64>,

    /// Last observed engine reset token; compared for change.
    last_reset_signal: u64,
    reset_count: u32,
    /// Edge-triggered "reset since last check" flag.
    map_reset_occurred: bool,
}

impl Session {
    /// Create a session. No engine is constructed until [`initialize`] is
    /// called.
    ///
    /// [`initialize`]: Session::initialize
    pub fn new(config: SessionConfig, factory: Box<dyn EngineFactory>) -> Self {
        let projector = OccupancyProjector::new(config.occupancy.clone());
        Self {
            config,
            factory,
            projector,
            engine: None,
            snapshot: TrackingState::SystemNotReady,
            current_pose: None,
            trajectory: Vec::new(),
            last_timestamp: None,
            last_reset_signal: 0,
            reset_count: 0,
            map_reset_occurred: false,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The configured sensor mode.
    pub fn sensor_mode(&self) -> SensorMode {
        self.config.sensor_mode
    }

    /// Construct the engine from the configured vocabulary, settings,
    /// sensor mode and viewer flag.
    ///
    /// Calling this while already running is `InvalidState`. On engine
    /// construction failure the session stays not-running and the error
    /// propagates as `Engine`.
    pub fn initialize(&mut self) -> Result<()> {
        if self.engine.is_some() {
            return Err(SessionError::InvalidState("session is already running"));
        }

        let engine = self.factory.create(
            &self.config.vocabulary_file,
            &self.config.settings_file,
            self.config.sensor_mode,
            self.config.use_viewer,
        )?;

        self.snapshot = TrackingState::from_ordinal(engine.tracking_state());
        self.last_reset_signal = engine.reset_signal();
        self.engine = Some(engine);

        log::info!(
            "session initialized: {} mode, viewer={}",
            self.config.sensor_mode,
            self.config.use_viewer
        );
        Ok(())
    }

    /// Whether an engine instance exists and has not been shut down.
    pub fn is_running(&self) -> bool {
        self.engine.is_some()
    }

    /// Ask the engine to discard its current map and tracking state while
    /// keeping the engine alive.
    ///
    /// The reset signal is re-polled before returning, so the reset
    /// counter and the edge-triggered flag are already updated when this
    /// call completes. The accumulated trajectory is session history and
    /// persists across resets; only `shutdown()` clears it. Frame
    /// timestamps must keep increasing across a reset.
    pub fn reset(&mut self) -> Result<()> {
        let engine = self
            .engine
            .as_mut()
            .ok_or(SessionError::InvalidState("session is not running"))?;

        engine.request_reset();
        self.snapshot = TrackingState::from_ordinal(engine.tracking_state());
        self.current_pose = None;
        self.poll_reset_signal();

        log::info!("map reset requested (count={})", self.reset_count);
        Ok(())
    }

    /// Release the engine and clear all session state.
    ///
    /// Idempotent: calling it while not running is a no-op. Also runs from
    /// `Drop`, so engine resources are released even without an explicit
    /// call. After shutdown every ingestion and telemetry call fails with
    /// `InvalidState` until the session is re-initialized.
    pub fn shutdown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.shutdown();
            log::info!("session shut down");
        }
        self.snapshot = TrackingState::SystemNotReady;
        self.current_pose = None;
        self.trajectory.clear();
        self.last_timestamp = None;
        self.last_reset_signal = 0;
        self.reset_count = 0;
        self.map_reset_occurred = false;
    }

    /// Set the viewer flag. Only allowed before `initialize()`; once the
    /// engine exists the flag cannot take effect, so the call fails with
    /// `InvalidState` instead of silently doing nothing.
    pub fn set_use_viewer(&mut self, use_viewer: bool) -> Result<()> {
        if self.engine.is_some() {
            return Err(SessionError::InvalidState(
                "viewer flag cannot change while running",
            ));
        }
        self.config.use_viewer = use_viewer;
        Ok(())
    }

    pub(crate) fn ensure_running(&self) -> Result<()> {
        if self.engine.is_some() {
            Ok(())
        } else {
            Err(SessionError::InvalidState("session is not running"))
        }
    }

    /// Compare the engine's reset token against the last observed value;
    /// on change, bump the counter and arm the edge-triggered flag.
    pub(crate) fn poll_reset_signal(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let signal = engine.reset_signal();
        if signal != self.last_reset_signal {
            self.last_reset_signal = signal;
            self.reset_count += 1;
            self.map_reset_occurred = true;
            log::debug!("map reset detected (count={})", self.reset_count);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
