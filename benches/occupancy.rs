use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drishti_session::{OccupancyProjector, OccupancyProjectorConfig};
use nalgebra::Point3;

/// Deterministic synthetic room: four walls plus scattered floor hits.
fn room_cloud(count: usize) -> Vec<Point3<f32>> {
    let mut points = Vec::with_capacity(count);
    let mut state = 0x9e3779b97f4a7c15u64;
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 40) as f32 / (1u64 << 24) as f32
    };

    for i in 0..count {
        let u = next();
        let p = match i % 5 {
            0 => Point3::new(u * 8.0 - 4.0, -0.5, -4.0), // north wall
            1 => Point3::new(u * 8.0 - 4.0, -0.8, 4.0),  // south wall
            2 => Point3::new(-4.0, -1.2, u * 8.0 - 4.0), // west wall
            3 => Point3::new(4.0, -0.3, u * 8.0 - 4.0),  // east wall
            _ => Point3::new(u * 8.0 - 4.0, -0.02, next() * 8.0 - 4.0), // floor
        };
        points.push(p);
    }
    points
}

fn bench_projection(c: &mut Criterion) {
    let projector = OccupancyProjector::new(OccupancyProjectorConfig::default());

    let mut group = c.benchmark_group("occupancy_projection");
    for &count in &[1_000usize, 10_000, 100_000] {
        let cloud = room_cloud(count);
        group.bench_function(format!("{count}_points"), |b| {
            b.iter(|| projector.project(black_box(&cloud)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
