//! Runs a full session lifecycle against the simulated engine: initialize,
//! feed a short monocular sequence, reset, query telemetry and the
//! occupancy grid, shut down.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example simulated_session
//! ```

use drishti_session::{
    Pose, Session, SessionConfig, SensorMode, SimulatedEngineFactory, TrackingState,
};
use image::GrayImage;
use nalgebra::{Point3, Translation3, UnitQuaternion};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (factory, handle) = SimulatedEngineFactory::new();
    let config = SessionConfig {
        vocabulary_file: "configs/vocabulary.txt".into(),
        settings_file: "configs/session.yaml".into(),
        sensor_mode: SensorMode::Monocular,
        use_viewer: false,
        occupancy: Default::default(),
    };
    let mut session = Session::new(config, Box::new(factory));
    session.initialize()?;
    println!("session running, state = {:?}", session.tracking_state()?);

    // Script a short sequence: initialization, then tracking along +X.
    handle.push_state(TrackingState::NotInitialized.ordinal());
    for i in 1..=5 {
        handle.push_ok(Pose::from_parts(
            Translation3::new(i as f32 * 0.1, 0.0, 0.0),
            UnitQuaternion::identity(),
        ));
    }
    handle.set_map_points(vec![
        Point3::new(1.0, -0.5, 2.0),
        Point3::new(1.02, -0.8, 2.01),
        Point3::new(0.5, -0.02, 1.0),
    ]);

    let image = GrayImage::new(640, 480);
    for i in 0..6 {
        let timestamp = i as f64 / 30.0;
        session.process_mono(&image, timestamp)?;
        println!(
            "frame {i}: state = {:?}, trajectory = {} poses",
            session.tracking_state()?,
            session.trajectory_len()?
        );
    }

    if let Some(pose) = session.current_pose()? {
        println!("current pose translation x = {:.2}", pose[(0, 3)]);
    }

    let grid = session.occupancy_grid()?;
    let (free, unknown, occupied) = grid.count_cells();
    println!(
        "occupancy grid {}x{} at {:.2} m/cell: {free} free, {occupied} occupied, {unknown} unknown",
        grid.width(),
        grid.height(),
        grid.resolution()
    );

    session.reset()?;
    println!(
        "after reset: count = {}, map reset flag = {}, trajectory kept = {} poses",
        session.reset_count()?,
        session.was_map_reset()?,
        session.trajectory_len()?
    );

    session.shutdown();
    println!("session shut down");
    Ok(())
}
