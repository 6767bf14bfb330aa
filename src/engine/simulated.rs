//! Scripted engine for tests and development without a real SLAM backend.
//!
//! Provides an API-compatible replacement for a real engine behind the
//! [`SlamEngine`] trait. A [`SimulatedEngineHandle`] shares state with the
//! engine the factory creates, so a test can keep scripting frames and
//! inspecting calls after the session has taken ownership of the instance.
//!
//! # Example
//!
//! ```
//! use drishti_session::{SimulatedEngineFactory, TrackingState, Pose};
//!
//! let (factory, handle) = SimulatedEngineFactory::new();
//! handle.push_state(TrackingState::NotInitialized.ordinal());
//! handle.push_ok(Pose::identity());
//! // pass `factory` to Session::new(...), keep `handle` for scripting
//! ```

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use nalgebra::Point3;

use super::{DepthImage, EngineError, EngineFactory, FrameEstimate, SensorMode, SlamEngine};
use crate::core::types::{ImuSample, Pose};
use image::GrayImage;

/// One scripted reaction to a track call.
#[derive(Debug, Clone)]
enum FrameResponse {
    Track { raw_state: i32, pose: Pose },
    Fail(String),
}

#[derive(Debug)]
struct SharedState {
    /// Queued responses, consumed one per track call.
    responses: VecDeque<FrameResponse>,
    /// Response used when the queue is empty.
    fallback: FrameResponse,
    map_points: Vec<Point3<f32>>,
    reset_signal: u64,
    /// Last state the engine reported (returned by `tracking_state`).
    raw_state: i32,
    frames_processed: u64,
    imu_samples_seen: u64,
    shut_down: bool,
    created_with: Option<(SensorMode, bool)>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            responses: VecDeque::new(),
            // Unscripted frames track successfully at the origin.
            fallback: FrameResponse::Track {
                raw_state: 2,
                pose: Pose::identity(),
            },
            map_points: Vec::new(),
            reset_signal: 0,
            raw_state: 0, // NoImagesYet
            frames_processed: 0,
            imu_samples_seen: 0,
            shut_down: false,
            created_with: None,
        }
    }
}

/// Scripted in-memory engine.
pub struct SimulatedEngine {
    state: Arc<Mutex<SharedState>>,
}

impl SimulatedEngine {
    fn track(&mut self) -> std::result::Result<FrameEstimate, EngineError> {
        let mut s = self.state.lock().unwrap();
        s.frames_processed += 1;
        let response = match s.responses.pop_front() {
            Some(r) => r,
            None => s.fallback.clone(),
        };
        match response {
            FrameResponse::Track { raw_state, pose } => {
                s.raw_state = raw_state;
                Ok(FrameEstimate { pose, raw_state })
            }
            FrameResponse::Fail(message) => Err(EngineError::Processing(message)),
        }
    }
}

impl SlamEngine for SimulatedEngine {
    fn track_mono(
        &mut self,
        _image: &GrayImage,
        _timestamp: f64,
    ) -> std::result::Result<FrameEstimate, EngineError> {
        self.track()
    }

    fn track_mono_inertial(
        &mut self,
        _image: &GrayImage,
        _timestamp: f64,
        imu: &[ImuSample],
    ) -> std::result::Result<FrameEstimate, EngineError> {
        self.state.lock().unwrap().imu_samples_seen += imu.len() as u64;
        self.track()
    }

    fn track_stereo(
        &mut self,
        _left: &GrayImage,
        _right: &GrayImage,
        _timestamp: f64,
    ) -> std::result::Result<FrameEstimate, EngineError> {
        self.track()
    }

    fn track_rgbd(
        &mut self,
        _image: &GrayImage,
        _depth: &DepthImage,
        _timestamp: f64,
    ) -> std::result::Result<FrameEstimate, EngineError> {
        self.track()
    }

    fn tracking_state(&self) -> i32 {
        self.state.lock().unwrap().raw_state
    }

    fn map_points(&self) -> Vec<Point3<f32>> {
        self.state.lock().unwrap().map_points.clone()
    }

    fn reset_signal(&self) -> u64 {
        self.state.lock().unwrap().reset_signal
    }

    fn request_reset(&mut self) {
        let mut s = self.state.lock().unwrap();
        s.reset_signal += 1;
        s.raw_state = 1; // NotInitialized until frames arrive again
        s.map_points.clear();
    }

    fn shutdown(&mut self) {
        self.state.lock().unwrap().shut_down = true;
    }
}

/// Scripting and inspection handle shared with the simulated engine.
#[derive(Clone)]
pub struct SimulatedEngineHandle {
    state: Arc<Mutex<SharedState>>,
}

impl SimulatedEngineHandle {
    /// Queue a frame response with an explicit state and pose.
    pub fn push_tracked(&self, raw_state: i32, pose: Pose) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(FrameResponse::Track { raw_state, pose });
    }

    /// Queue a successfully tracked frame (state `Ok`).
    pub fn push_ok(&self, pose: Pose) {
        self.push_tracked(2, pose);
    }

    /// Queue a frame response with the given state and an identity pose.
    pub fn push_state(&self, raw_state: i32) {
        self.push_tracked(raw_state, Pose::identity());
    }

    /// Queue an engine failure for the next track call.
    pub fn push_failure(&self, message: &str) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(FrameResponse::Fail(message.to_string()));
    }

    /// Set the response used once the queue runs dry.
    pub fn set_fallback(&self, raw_state: i32, pose: Pose) {
        self.state.lock().unwrap().fallback = FrameResponse::Track { raw_state, pose };
    }

    /// Replace the engine's current map-point cloud.
    pub fn set_map_points(&self, points: Vec<Point3<f32>>) {
        self.state.lock().unwrap().map_points = points;
    }

    /// Simulate an engine-internal map reset (no `request_reset` involved).
    pub fn bump_reset_signal(&self) {
        self.state.lock().unwrap().reset_signal += 1;
    }

    /// Number of track calls the engine received.
    pub fn frames_processed(&self) -> u64 {
        self.state.lock().unwrap().frames_processed
    }

    /// Total IMU samples forwarded through `track_mono_inertial`.
    pub fn imu_samples_seen(&self) -> u64 {
        self.state.lock().unwrap().imu_samples_seen
    }

    /// Whether `shutdown` was called on the engine.
    pub fn was_shut_down(&self) -> bool {
        self.state.lock().unwrap().shut_down
    }

    /// Sensor mode and viewer flag the factory was last invoked with.
    pub fn created_with(&self) -> Option<(SensorMode, bool)> {
        self.state.lock().unwrap().created_with
    }
}

/// Factory producing [`SimulatedEngine`] instances that share state with a
/// [`SimulatedEngineHandle`].
pub struct SimulatedEngineFactory {
    state: Arc<Mutex<SharedState>>,
    fail_construction: Option<String>,
}

impl SimulatedEngineFactory {
    /// Create a factory plus the handle used to script and inspect the
    /// engines it produces.
    pub fn new() -> (Self, SimulatedEngineHandle) {
        let state = Arc::new(Mutex::new(SharedState::default()));
        (
            Self {
                state: state.clone(),
                fail_construction: None,
            },
            SimulatedEngineHandle { state },
        )
    }

    /// A factory whose `create` always fails, for initialize-failure tests.
    pub fn failing(message: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            fail_construction: Some(message.to_string()),
        }
    }
}

impl EngineFactory for SimulatedEngineFactory {
    fn create(
        &self,
        _vocabulary_file: &Path,
        _settings_file: &Path,
        mode: SensorMode,
        use_viewer: bool,
    ) -> std::result::Result<Box<dyn SlamEngine>, EngineError> {
        if let Some(message) = &self.fail_construction {
            return Err(EngineError::Construction(message.clone()));
        }
        let mut s = self.state.lock().unwrap();
        s.shut_down = false;
        s.created_with = Some((mode, use_viewer));
        drop(s);
        Ok(Box::new(SimulatedEngine {
            state: self.state.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TrackingState;
    use image::GrayImage;

    fn make_engine() -> (Box<dyn SlamEngine>, SimulatedEngineHandle) {
        let (factory, handle) = SimulatedEngineFactory::new();
        let engine = factory
            .create(
                Path::new("voc.txt"),
                Path::new("settings.yaml"),
                SensorMode::Monocular,
                false,
            )
            .unwrap();
        (engine, handle)
    }

    #[test]
    fn test_scripted_responses_consumed_in_order() {
        let (mut engine, handle) = make_engine();
        handle.push_state(TrackingState::NotInitialized.ordinal());
        handle.push_ok(Pose::identity());

        let img = GrayImage::new(4, 4);
        let first = engine.track_mono(&img, 0.0).unwrap();
        assert_eq!(first.raw_state, TrackingState::NotInitialized.ordinal());

        let second = engine.track_mono(&img, 0.1).unwrap();
        assert_eq!(second.raw_state, TrackingState::Ok.ordinal());
        assert_eq!(handle.frames_processed(), 2);
    }

    #[test]
    fn test_fallback_when_queue_empty() {
        let (mut engine, _handle) = make_engine();
        let img = GrayImage::new(4, 4);
        let est = engine.track_mono(&img, 0.0).unwrap();
        assert_eq!(est.raw_state, TrackingState::Ok.ordinal());
    }

    #[test]
    fn test_request_reset_bumps_signal() {
        let (mut engine, _handle) = make_engine();
        let before = engine.reset_signal();
        engine.request_reset();
        assert_eq!(engine.reset_signal(), before + 1);
        assert_eq!(
            engine.tracking_state(),
            TrackingState::NotInitialized.ordinal()
        );
    }

    #[test]
    fn test_scripted_failure() {
        let (mut engine, handle) = make_engine();
        handle.push_failure("tracker crashed");
        let img = GrayImage::new(4, 4);
        let err = engine.track_mono(&img, 0.0).unwrap_err();
        assert!(matches!(err, EngineError::Processing(_)));
    }
}
