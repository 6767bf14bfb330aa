//! The seam between the session facade and the underlying SLAM engine.
//!
//! Everything past this boundary (feature tracking, bundle adjustment,
//! loop closing, map optimization, vocabulary/settings parsing) is owned
//! by the engine and consumed only through the [`SlamEngine`] trait.
//! [`EngineFactory`] binds a vocabulary file, settings file, sensor mode
//! and viewer flag to a concrete engine instance so the session stays
//! engine-agnostic.

mod simulated;

pub use simulated::{SimulatedEngine, SimulatedEngineFactory, SimulatedEngineHandle};

use std::fmt;
use std::path::Path;

use image::GrayImage;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{ImuSample, Pose};

/// 16-bit depth frame, values passed through to the engine unscaled.
pub type DepthImage = image::ImageBuffer<image::Luma<u16>, Vec<u16>>;

/// Sensor configuration of a session. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorMode {
    Monocular,
    MonocularInertial,
    Stereo,
    Rgbd,
}

impl fmt::Display for SensorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SensorMode::Monocular => "monocular",
            SensorMode::MonocularInertial => "monocular-inertial",
            SensorMode::Stereo => "stereo",
            SensorMode::Rgbd => "rgbd",
        })
    }
}

/// Tracking state mirrored from the engine.
///
/// Discriminants match the engine's raw ordinals, so a cached snapshot can
/// be handed back to ordinal-based callers unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum TrackingState {
    /// Engine exists but is not ready to accept frames.
    SystemNotReady = -1,
    /// No frame has been ingested yet.
    NoImagesYet = 0,
    /// Frames seen, map not yet initialized.
    NotInitialized = 1,
    /// Tracking normally; poses are valid.
    Ok = 2,
    /// Tracking lost recently, relocalization still plausible.
    RecentlyLost = 3,
    /// Tracking lost.
    Lost = 4,
}

impl TrackingState {
    /// Convert a raw engine ordinal. Total: unknown ordinals map to
    /// `SystemNotReady` rather than failing.
    pub fn from_ordinal(raw: i32) -> Self {
        match raw {
            -1 => TrackingState::SystemNotReady,
            0 => TrackingState::NoImagesYet,
            1 => TrackingState::NotInitialized,
            2 => TrackingState::Ok,
            3 => TrackingState::RecentlyLost,
            4 => TrackingState::Lost,
            _ => TrackingState::SystemNotReady,
        }
    }

    /// The engine's raw ordinal for this state.
    #[inline]
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Whether this state counts as lost.
    #[inline]
    pub fn is_lost(self) -> bool {
        matches!(self, TrackingState::RecentlyLost | TrackingState::Lost)
    }
}

/// Engine-reported failures.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine construction failed: {0}")]
    Construction(String),

    #[error("frame processing failed: {0}")]
    Processing(String),
}

/// Per-frame result returned by the engine: the estimated pose and the
/// raw tracking-state ordinal that produced it.
#[derive(Debug, Clone, Copy)]
pub struct FrameEstimate {
    pub pose: Pose,
    pub raw_state: i32,
}

/// The underlying localization-and-mapping engine, treated as opaque.
///
/// The engine is not re-entrant; callers must serialize all calls. The
/// session enforces this by owning the instance exclusively and exposing
/// only `&mut self` entry points.
pub trait SlamEngine {
    /// Ingest a monocular frame.
    fn track_mono(
        &mut self,
        image: &GrayImage,
        timestamp: f64,
    ) -> std::result::Result<FrameEstimate, EngineError>;

    /// Ingest a monocular frame with inertial samples leading up to it.
    fn track_mono_inertial(
        &mut self,
        image: &GrayImage,
        timestamp: f64,
        imu: &[ImuSample],
    ) -> std::result::Result<FrameEstimate, EngineError>;

    /// Ingest a rectified stereo pair.
    fn track_stereo(
        &mut self,
        left: &GrayImage,
        right: &GrayImage,
        timestamp: f64,
    ) -> std::result::Result<FrameEstimate, EngineError>;

    /// Ingest an image plus registered depth frame.
    fn track_rgbd(
        &mut self,
        image: &GrayImage,
        depth: &DepthImage,
        timestamp: f64,
    ) -> std::result::Result<FrameEstimate, EngineError>;

    /// Raw tracking-state ordinal as the engine currently reports it.
    fn tracking_state(&self) -> i32;

    /// The engine's current 3D map points, in world coordinates.
    ///
    /// Points may be revised retroactively by the engine's internal
    /// optimization, so consumers must not cache across calls.
    fn map_points(&self) -> Vec<Point3<f32>>;

    /// Opaque token that changes whenever the engine discards its map.
    /// Only compared for change, never interpreted.
    fn reset_signal(&self) -> u64;

    /// Ask the engine to discard its current map and tracking state while
    /// staying alive.
    fn request_reset(&mut self);

    /// Release all engine resources (threads, viewer windows). Must be
    /// idempotent-safe: the session also calls this from `Drop`.
    fn shutdown(&mut self);
}

/// Constructs engines bound to a vocabulary/settings pair.
///
/// File contents are opaque configuration passed through unchanged; the
/// facade never parses them.
pub trait EngineFactory {
    fn create(
        &self,
        vocabulary_file: &Path,
        settings_file: &Path,
        mode: SensorMode,
        use_viewer: bool,
    ) -> std::result::Result<Box<dyn SlamEngine>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_state_ordinal_round_trip() {
        for state in [
            TrackingState::SystemNotReady,
            TrackingState::NoImagesYet,
            TrackingState::NotInitialized,
            TrackingState::Ok,
            TrackingState::RecentlyLost,
            TrackingState::Lost,
        ] {
            assert_eq!(TrackingState::from_ordinal(state.ordinal()), state);
        }
    }

    #[test]
    fn test_unknown_ordinal_maps_to_not_ready() {
        assert_eq!(
            TrackingState::from_ordinal(99),
            TrackingState::SystemNotReady
        );
        assert_eq!(
            TrackingState::from_ordinal(-7),
            TrackingState::SystemNotReady
        );
    }

    #[test]
    fn test_is_lost() {
        assert!(TrackingState::RecentlyLost.is_lost());
        assert!(TrackingState::Lost.is_lost());
        assert!(!TrackingState::Ok.is_lost());
        assert!(!TrackingState::NoImagesYet.is_lost());
    }
}
