//! 2D projection of the engine's 3D map.

mod occupancy;

pub use occupancy::{
    OccupancyGrid, OccupancyProjector, OccupancyProjectorConfig, CELL_FREE, CELL_OCCUPIED,
    CELL_UNKNOWN,
};
