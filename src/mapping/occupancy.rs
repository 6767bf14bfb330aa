//! Occupancy projection of 3D map points onto the ground plane.
//!
//! # Axis convention
//!
//! Map points arrive in the camera world frame with +Y pointing down, so
//! height above the floor is `-y` and the ground plane is X-Z. The grid
//! maps world X to columns and world Z to rows.
//!
//! # Classification
//!
//! Each point is binned by height: inside the obstacle band it counts as
//! occupancy evidence for its cell, below the band (a floor hit) it counts
//! as free-space evidence, above the band (ceiling) it is discarded. Cells
//! are then thresholded on point density. Engine optimization can revise
//! map points retroactively, so the projection is recomputed in full on
//! every query; nothing is cached.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Cell value for unexplored space.
pub const CELL_UNKNOWN: i16 = -1;
/// Cell value for observed free space.
pub const CELL_FREE: i16 = 0;
/// Cell value for occupied space.
pub const CELL_OCCUPIED: i16 = 100;

/// Configuration for the occupancy projector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupancyProjectorConfig {
    /// Cell size in meters.
    pub resolution: f32,

    /// Half-extent in meters of the grid returned for an empty map.
    pub min_extent: f32,

    /// Points farther than this (in X or Z) from the origin are ignored
    /// and the fitted grid is clamped to this half-extent.
    pub max_extent: f32,

    /// Lower edge of the obstacle height band in meters. Points below it
    /// are floor hits (free-space evidence).
    pub obstacle_min_height: f32,

    /// Upper edge of the obstacle height band in meters. Points above it
    /// are discarded (ceiling, fixtures).
    pub obstacle_max_height: f32,

    /// Minimum obstacle points in a cell to mark it occupied.
    pub occupied_min_points: usize,

    /// Minimum floor points in a cell to mark it free.
    pub free_min_points: usize,

    /// Border in meters added around the fitted point-cloud bounds.
    pub padding: f32,
}

impl Default for OccupancyProjectorConfig {
    fn default() -> Self {
        Self {
            resolution: 0.05,
            min_extent: 1.0,
            max_extent: 50.0,
            obstacle_min_height: 0.15,
            obstacle_max_height: 2.0,
            occupied_min_points: 2,
            free_min_points: 1,
            padding: 0.25,
        }
    }
}

/// 2D occupancy grid derived from a map-point cloud.
///
/// Row-major storage: index = row * width + col, where columns follow
/// world X and rows follow world Z.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    cells: Vec<i16>,
    width: usize,
    height: usize,
    resolution: f32,
    /// World X of column 0.
    origin_x: f32,
    /// World Z of row 0.
    origin_z: f32,
}

impl OccupancyGrid {
    fn unknown(width: usize, height: usize, resolution: f32, origin_x: f32, origin_z: f32) -> Self {
        Self {
            cells: vec![CELL_UNKNOWN; width * height],
            width,
            height,
            resolution,
            origin_x,
            origin_z,
        }
    }

    /// Grid width in cells (world X axis).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells (world Z axis).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid dimensions as (width, height).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Cell size in meters.
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// World (x, z) of cell (0, 0).
    pub fn origin(&self) -> (f32, f32) {
        (self.origin_x, self.origin_z)
    }

    /// Raw cells, row-major.
    pub fn cells(&self) -> &[i16] {
        &self.cells
    }

    /// Cell value at (col, row). Out-of-bounds reads as unknown.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> i16 {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col]
        } else {
            CELL_UNKNOWN
        }
    }

    /// Convert world (x, z) to (col, row).
    ///
    /// Returns `None` outside grid bounds.
    #[inline]
    pub fn world_to_cell(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        let col = ((x - self.origin_x) / self.resolution).floor();
        let row = ((z - self.origin_z) / self.resolution).floor();

        if col >= 0.0 && row >= 0.0 {
            let col = col as usize;
            let row = row as usize;
            if col < self.width && row < self.height {
                return Some((col, row));
            }
        }
        None
    }

    /// Convert (col, row) to world (x, z) at the cell center.
    #[inline]
    pub fn cell_to_world(&self, col: usize, row: usize) -> (f32, f32) {
        (
            self.origin_x + (col as f32 + 0.5) * self.resolution,
            self.origin_z + (row as f32 + 0.5) * self.resolution,
        )
    }

    /// Count cells as (free, unknown, occupied).
    pub fn count_cells(&self) -> (usize, usize, usize) {
        let mut free = 0;
        let mut unknown = 0;
        let mut occupied = 0;
        for &cell in &self.cells {
            match cell {
                CELL_FREE => free += 1,
                CELL_OCCUPIED => occupied += 1,
                _ => unknown += 1,
            }
        }
        (free, unknown, occupied)
    }
}

/// Projects a 3D map-point cloud into an [`OccupancyGrid`].
#[derive(Debug, Clone)]
pub struct OccupancyProjector {
    config: OccupancyProjectorConfig,
}

impl OccupancyProjector {
    /// Create a projector.
    pub fn new(config: OccupancyProjectorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OccupancyProjectorConfig {
        &self.config
    }

    /// Project map points into a fresh grid. Full recomputation per call.
    pub fn project(&self, points: &[Point3<f32>]) -> OccupancyGrid {
        let cfg = &self.config;

        // Height-classify and bound the cloud in one pass.
        let mut retained: Vec<(f32, f32, bool)> = Vec::with_capacity(points.len());
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_z = f32::INFINITY;
        let mut max_z = f32::NEG_INFINITY;

        for p in points {
            let height = -p.y;
            if height > cfg.obstacle_max_height {
                continue;
            }
            if p.x.abs() > cfg.max_extent || p.z.abs() > cfg.max_extent {
                continue;
            }
            let obstacle = height >= cfg.obstacle_min_height;
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_z = min_z.min(p.z);
            max_z = max_z.max(p.z);
            retained.push((p.x, p.z, obstacle));
        }

        if retained.is_empty() {
            let side = (2.0 * cfg.min_extent / cfg.resolution).ceil() as usize;
            return OccupancyGrid::unknown(
                side,
                side,
                cfg.resolution,
                -cfg.min_extent,
                -cfg.min_extent,
            );
        }

        let origin_x = min_x - cfg.padding;
        let origin_z = min_z - cfg.padding;
        let width = ((max_x + cfg.padding - origin_x) / cfg.resolution).ceil() as usize + 1;
        let height = ((max_z + cfg.padding - origin_z) / cfg.resolution).ceil() as usize + 1;

        let mut obstacle_hits = vec![0u32; width * height];
        let mut floor_hits = vec![0u32; width * height];

        for (x, z, obstacle) in retained {
            let col = (((x - origin_x) / cfg.resolution).floor() as usize).min(width - 1);
            let row = (((z - origin_z) / cfg.resolution).floor() as usize).min(height - 1);
            let idx = row * width + col;
            if obstacle {
                obstacle_hits[idx] += 1;
            } else {
                floor_hits[idx] += 1;
            }
        }

        let cells = obstacle_hits
            .iter()
            .zip(&floor_hits)
            .map(|(&obstacles, &floors)| {
                if obstacles as usize >= cfg.occupied_min_points {
                    CELL_OCCUPIED
                } else if floors as usize >= cfg.free_min_points {
                    CELL_FREE
                } else {
                    CELL_UNKNOWN
                }
            })
            .collect();

        log::debug!(
            "occupancy projection: {} map points -> {}x{} grid at {:.3} m/cell",
            points.len(),
            width,
            height,
            cfg.resolution
        );

        OccupancyGrid {
            cells,
            width,
            height,
            resolution: cfg.resolution,
            origin_x,
            origin_z,
        }
    }
}
