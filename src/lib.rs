//! drishti-session - Session facade for visual/inertial SLAM engines.
//!
//! Sits between a scripting caller and a real-time localization-and-mapping
//! engine. The engine itself (feature tracking, bundle adjustment, loop
//! closing) is an external collaborator behind the [`SlamEngine`] trait;
//! this crate owns everything around it:
//!
//! - lifecycle of the heavyweight, non-restartable engine instance
//!   (initialize / reset / shutdown, with teardown guaranteed on drop);
//! - a uniform ingestion contract for the four sensor configurations
//!   (monocular, monocular+IMU, stereo, RGB-D), with input validation
//!   before the engine is ever touched;
//! - detection of asynchronous engine events the engine does not surface
//!   directly (tracking loss, map resets via change-polling an opaque
//!   reset signal);
//! - derived outputs: a 6-DoF pose trajectory and a 2D occupancy
//!   projection of the engine's 3D map points.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 session/                    │  ← Lifecycle, ingestion,
//! │      (Session, SessionConfig, telemetry)    │    cached telemetry
//! └─────────────────────────────────────────────┘
//!            │                        │
//! ┌─────────────────────┐  ┌─────────────────────┐
//! │      engine/        │  │      mapping/       │  ← Engine seam and
//! │ (SlamEngine trait,  │  │  (OccupancyGrid,    │    map-point projection
//! │  SimulatedEngine)   │  │   projector)        │
//! └─────────────────────┘  └─────────────────────┘
//!            │                        │
//! ┌─────────────────────────────────────────────┐
//! │                   core/                     │  ← Pose and IMU types
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The calling convention is single-threaded and synchronous: all mutating
//! operations take `&mut self`, so no two ingestion calls (or an ingestion
//! call and a reset/shutdown) can overlap on the same session.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Engine seam (depends on core)
// ============================================================================
pub mod engine;

// ============================================================================
// Layer 3: Map projection (depends on core)
// ============================================================================
pub mod mapping;

// ============================================================================
// Layer 4: Session facade (depends on all layers)
// ============================================================================
pub mod session;

pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::types::{ImuSample, Pose};

// Engine seam
pub use engine::{
    DepthImage, EngineError, EngineFactory, FrameEstimate, SensorMode, SimulatedEngine,
    SimulatedEngineFactory, SimulatedEngineHandle, SlamEngine, TrackingState,
};

// Mapping
pub use mapping::{
    OccupancyGrid, OccupancyProjector, OccupancyProjectorConfig, CELL_FREE, CELL_OCCUPIED,
    CELL_UNKNOWN,
};

// Session
pub use session::{Session, SessionConfig};

// Errors
pub use error::{Result, SessionError};
