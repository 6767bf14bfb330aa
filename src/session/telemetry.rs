//! Telemetry accessors over the cached session state.
//!
//! Accessors read the snapshot refreshed by ingestion (poll-after-mutate)
//! and never recompute from the engine, so telemetry reads are cheap and
//! consistent within a call cycle; they reflect the last ingested frame,
//! not real time. The one exception is the occupancy query, which reads
//! the engine's live map points because those are revised retroactively
//! by the engine's optimization.

use nalgebra::Matrix4;

use super::Session;
use crate::core::types::Pose;
use crate::engine::TrackingState;
use crate::error::{Result, SessionError};
use crate::mapping::OccupancyGrid;

impl Session {
    /// Tracking state cached from the last ingestion call.
    pub fn tracking_state(&self) -> Result<TrackingState> {
        self.ensure_running()?;
        Ok(self.snapshot)
    }

    /// Whether the cached state is `RecentlyLost` or `Lost`.
    pub fn is_lost(&self) -> Result<bool> {
        self.ensure_running()?;
        Ok(self.snapshot.is_lost())
    }

    /// The full accumulated trajectory in matrix form, one entry per
    /// ingestion call whose resulting state was `Ok`, in call order.
    ///
    /// Persists across `reset()`; cleared only by `shutdown()`.
    pub fn trajectory(&self) -> Result<Vec<Matrix4<f32>>> {
        self.ensure_running()?;
        Ok(self.trajectory.iter().map(Pose::matrix).collect())
    }

    /// Number of poses accumulated so far.
    pub fn trajectory_len(&self) -> Result<usize> {
        self.ensure_running()?;
        Ok(self.trajectory.len())
    }

    /// Edge-triggered reset check: true exactly once per detected reset
    /// signal change, then false until the next change. Consumers that
    /// miss a poll miss the event; lossy by construction.
    pub fn was_map_reset(&mut self) -> Result<bool> {
        self.ensure_running()?;
        Ok(std::mem::take(&mut self.map_reset_occurred))
    }

    /// Total resets detected since `initialize()`. Monotone; survives
    /// `reset()`, zeroed by `shutdown()`.
    pub fn reset_count(&self) -> Result<u32> {
        self.ensure_running()?;
        Ok(self.reset_count)
    }

    /// The current pose in matrix form, or `None` when the cached tracking
    /// state is not `Ok` (the explicit "no valid pose" sentinel). Callers
    /// should check [`tracking_state`] or [`is_lost`] before trusting a
    /// returned pose.
    ///
    /// [`tracking_state`]: Session::tracking_state
    /// [`is_lost`]: Session::is_lost
    pub fn current_pose(&self) -> Result<Option<Matrix4<f32>>> {
        self.ensure_running()?;
        if self.snapshot == TrackingState::Ok {
            Ok(self.current_pose.map(|p| p.matrix()))
        } else {
            Ok(None)
        }
    }

    /// Project the engine's current 3D map points into a 2D occupancy
    /// grid. Recomputed in full on every call; map points can be revised
    /// retroactively by the engine's optimization, so nothing is cached.
    pub fn occupancy_grid(&self) -> Result<OccupancyGrid> {
        let engine = self
            .engine
            .as_ref()
            .ok_or(SessionError::InvalidState("session is not running"))?;
        let points = engine.map_points();
        Ok(self.projector.project(&points))
    }
}
