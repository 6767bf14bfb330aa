//! Frame ingestion: one entry point per sensor mode.
//!
//! Every entry point runs the same gauntlet before the engine is touched:
//! the session must be running, the call must match the configured sensor
//! mode, the timestamp must strictly increase, and the payload must be
//! well-formed. A rejected frame leaves the trajectory, the timestamp
//! watermark, and the reset bookkeeping untouched.
//!
//! `Ok(())` means the frame was accepted, not that tracking succeeded;
//! tracking quality is read separately through the telemetry accessors.

use image::GrayImage;

use super::Session;
use crate::core::types::ImuSample;
use crate::engine::{DepthImage, EngineError, FrameEstimate, SensorMode, SlamEngine, TrackingState};
use crate::error::{Result, SessionError};

impl Session {
    /// Ingest a monocular frame.
    pub fn process_mono(&mut self, image: &GrayImage, timestamp: f64) -> Result<()> {
        self.ensure_running()?;
        self.ensure_mode(SensorMode::Monocular)?;
        self.ensure_timestamp_advances(timestamp)?;
        self.ingest(timestamp, |engine| engine.track_mono(image, timestamp))
    }

    /// Ingest a monocular frame with the inertial samples recorded since
    /// the previous frame.
    ///
    /// Samples must be non-decreasing in time and none may be ahead of the
    /// frame timestamp. An empty sequence is accepted; the frame degrades
    /// to visual-only.
    pub fn process_mono_inertial(
        &mut self,
        image: &GrayImage,
        timestamp: f64,
        imu: &[ImuSample],
    ) -> Result<()> {
        self.ensure_running()?;
        self.ensure_mode(SensorMode::MonocularInertial)?;
        self.ensure_timestamp_advances(timestamp)?;
        validate_imu(imu, timestamp)?;
        if imu.is_empty() {
            log::debug!("empty imu sequence at t={timestamp:.6}, visual-only frame");
        }
        self.ingest(timestamp, |engine| {
            engine.track_mono_inertial(image, timestamp, imu)
        })
    }

    /// Ingest a rectified stereo pair. Left and right must have matching
    /// dimensions.
    pub fn process_stereo(
        &mut self,
        left: &GrayImage,
        right: &GrayImage,
        timestamp: f64,
    ) -> Result<()> {
        self.ensure_running()?;
        self.ensure_mode(SensorMode::Stereo)?;
        self.ensure_timestamp_advances(timestamp)?;
        if left.dimensions() != right.dimensions() {
            return Err(SessionError::InvalidInput(format!(
                "stereo pair dimensions differ: left {}x{}, right {}x{}",
                left.width(),
                left.height(),
                right.width(),
                right.height()
            )));
        }
        self.ingest(timestamp, |engine| {
            engine.track_stereo(left, right, timestamp)
        })
    }

    /// Ingest an image plus registered depth frame of matching dimensions.
    /// Depth values pass through to the engine unscaled and unclamped.
    pub fn process_rgbd(&mut self, image: &GrayImage, depth: &DepthImage, timestamp: f64) -> Result<()> {
        self.ensure_running()?;
        self.ensure_mode(SensorMode::Rgbd)?;
        self.ensure_timestamp_advances(timestamp)?;
        if image.dimensions() != depth.dimensions() {
            return Err(SessionError::InvalidInput(format!(
                "image and depth dimensions differ: image {}x{}, depth {}x{}",
                image.width(),
                image.height(),
                depth.width(),
                depth.height()
            )));
        }
        self.ingest(timestamp, |engine| engine.track_rgbd(image, depth, timestamp))
    }

    fn ensure_mode(&self, requested: SensorMode) -> Result<()> {
        if self.config.sensor_mode == requested {
            Ok(())
        } else {
            Err(SessionError::InvalidSensorMode {
                configured: self.config.sensor_mode,
                requested,
            })
        }
    }

    fn ensure_timestamp_advances(&self, timestamp: f64) -> Result<()> {
        match self.last_timestamp {
            Some(last) if timestamp <= last => Err(SessionError::InvalidInput(format!(
                "non-increasing timestamp: {timestamp} after {last}"
            ))),
            _ => Ok(()),
        }
    }

    /// Shared postcondition for all four entry points: forward the frame,
    /// refresh the cached snapshot, append to the trajectory on `Ok`
    /// tracking (the identity pose of a first frame included), and re-poll
    /// the reset signal. An engine failure degrades the snapshot to `Lost`
    /// but leaves the session running.
    fn ingest(
        &mut self,
        timestamp: f64,
        track: impl FnOnce(&mut dyn SlamEngine) -> std::result::Result<FrameEstimate, EngineError>,
    ) -> Result<()> {
        let engine = self
            .engine
            .as_mut()
            .ok_or(SessionError::InvalidState("session is not running"))?;

        match track(engine.as_mut()) {
            Ok(estimate) => {
                self.last_timestamp = Some(timestamp);
                self.snapshot = TrackingState::from_ordinal(estimate.raw_state);
                if self.snapshot == TrackingState::Ok {
                    self.current_pose = Some(estimate.pose);
                    self.trajectory.push(estimate.pose);
                }
                self.poll_reset_signal();
                Ok(())
            }
            Err(err) => {
                log::warn!("engine failed on frame at t={timestamp:.6}: {err}");
                self.snapshot = TrackingState::Lost;
                Err(err.into())
            }
        }
    }
}

fn validate_imu(imu: &[ImuSample], frame_timestamp: f64) -> Result<()> {
    let mut previous = f64::NEG_INFINITY;
    for sample in imu {
        if sample.timestamp < previous {
            return Err(SessionError::InvalidInput(format!(
                "imu sequence out of order: {} after {}",
                sample.timestamp, previous
            )));
        }
        if sample.timestamp > frame_timestamp {
            return Err(SessionError::InvalidInput(format!(
                "imu sample at {} is ahead of frame at {}",
                sample.timestamp, frame_timestamp
            )));
        }
        previous = sample.timestamp;
    }
    Ok(())
}
