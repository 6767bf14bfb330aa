//! Session-level occupancy queries against scripted engine map points.

use drishti_session::{
    OccupancyProjectorConfig, Session, SessionConfig, SensorMode, SimulatedEngineFactory,
    SimulatedEngineHandle, CELL_FREE, CELL_OCCUPIED, CELL_UNKNOWN,
};
use image::GrayImage;
use nalgebra::Point3;

fn running_session() -> (Session, SimulatedEngineHandle) {
    env_logger::try_init().ok();
    let (factory, handle) = SimulatedEngineFactory::new();
    let config = SessionConfig {
        vocabulary_file: "configs/vocabulary.txt".into(),
        settings_file: "configs/session.yaml".into(),
        sensor_mode: SensorMode::Monocular,
        use_viewer: false,
        occupancy: OccupancyProjectorConfig {
            resolution: 0.1,
            occupied_min_points: 2,
            free_min_points: 1,
            padding: 0.2,
            ..Default::default()
        },
    };
    let mut session = Session::new(config, Box::new(factory));
    session.initialize().unwrap();
    (session, handle)
}

/// Point at ground-plane (x, z) with height h above the floor (+Y is down).
fn point_at(x: f32, z: f32, h: f32) -> Point3<f32> {
    Point3::new(x, -h, z)
}

#[test]
fn empty_map_produces_default_unknown_grid() {
    let (session, _handle) = running_session();

    let grid = session.occupancy_grid().unwrap();
    let (free, unknown, occupied) = grid.count_cells();
    assert_eq!(free, 0);
    assert_eq!(occupied, 0);
    assert_eq!(unknown, grid.width() * grid.height());

    // Default grid spans [-min_extent, min_extent] in both axes.
    let (ox, oz) = grid.origin();
    assert_eq!(ox, -1.0);
    assert_eq!(oz, -1.0);
}

#[test]
fn map_points_classified_by_height() {
    let (session, handle) = running_session();
    handle.set_map_points(vec![
        // Wall at (1, 2): two points inside the obstacle band.
        point_at(1.0, 2.0, 0.5),
        point_at(1.02, 2.01, 0.9),
        // Floor hit at (0, 0.5).
        point_at(0.0, 0.5, 0.02),
        // Ceiling fixture, discarded.
        point_at(0.5, 0.5, 4.0),
    ]);

    let grid = session.occupancy_grid().unwrap();

    let (col, row) = grid.world_to_cell(1.0, 2.0).unwrap();
    assert_eq!(grid.get(col, row), CELL_OCCUPIED);

    let (col, row) = grid.world_to_cell(0.0, 0.5).unwrap();
    assert_eq!(grid.get(col, row), CELL_FREE);

    let (col, row) = grid.world_to_cell(0.5, 0.5).unwrap();
    assert_eq!(grid.get(col, row), CELL_UNKNOWN);
}

#[test]
fn grid_recomputed_on_every_query() {
    let (mut session, handle) = running_session();
    handle.set_map_points(vec![point_at(1.0, 1.0, 0.5), point_at(1.0, 1.0, 0.6)]);

    let grid = session.occupancy_grid().unwrap();
    let (col, row) = grid.world_to_cell(1.0, 1.0).unwrap();
    assert_eq!(grid.get(col, row), CELL_OCCUPIED);

    // Bundle adjustment moved the points; the next query reflects it
    // with no ingestion in between.
    handle.set_map_points(vec![point_at(3.0, 3.0, 0.5), point_at(3.0, 3.0, 0.6)]);
    let grid = session.occupancy_grid().unwrap();
    let (col, row) = grid.world_to_cell(3.0, 3.0).unwrap();
    assert_eq!(grid.get(col, row), CELL_OCCUPIED);
    match grid.world_to_cell(1.0, 1.0) {
        Some((col, row)) => assert_ne!(grid.get(col, row), CELL_OCCUPIED),
        None => {}
    }

    // Reset clears the engine map: back to the default unknown grid.
    session.reset().unwrap();
    let grid = session.occupancy_grid().unwrap();
    let (free, unknown, occupied) = grid.count_cells();
    assert_eq!((free, occupied), (0, 0));
    assert_eq!(unknown, grid.width() * grid.height());
}

#[test]
fn grid_fits_point_cloud_bounds() {
    let (session, handle) = running_session();
    handle.set_map_points(vec![
        point_at(-2.0, -1.0, 0.5),
        point_at(-2.0, -1.0, 0.5),
        point_at(4.0, 3.0, 0.5),
        point_at(4.0, 3.0, 0.5),
    ]);

    let grid = session.occupancy_grid().unwrap();

    // Both extremes fall inside the grid, padded bounds do too.
    assert!(grid.world_to_cell(-2.0, -1.0).is_some());
    assert!(grid.world_to_cell(4.0, 3.0).is_some());
    let (ox, oz) = grid.origin();
    assert!(ox <= -2.0 && oz <= -1.0);

    // Roughly (6 + 2*padding) x (4 + 2*padding) meters at 0.1 m/cell.
    assert!(grid.width() >= 64 && grid.width() <= 66);
    assert!(grid.height() >= 44 && grid.height() <= 46);
}

#[test]
fn occupancy_query_works_mid_session() {
    let (mut session, handle) = running_session();

    session.process_mono(&GrayImage::new(640, 480), 0.0).unwrap();
    handle.set_map_points(vec![point_at(0.5, 0.5, 0.3), point_at(0.5, 0.5, 0.4)]);
    session.process_mono(&GrayImage::new(640, 480), 0.1).unwrap();

    let grid = session.occupancy_grid().unwrap();
    let (col, row) = grid.world_to_cell(0.5, 0.5).unwrap();
    assert_eq!(grid.get(col, row), CELL_OCCUPIED);
}
