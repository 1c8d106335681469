use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use waypoint_nav::{PathFinder, Waypoint, WaypointGraph, WaypointId};

/// Waypoints scattered over a square field with a circular pond in the middle that
/// blocks line of sight.
fn scattered_waypoints(n: usize, rng: &mut StdRng) -> Vec<Waypoint> {
    (0..n)
        .map(|_| {
            Waypoint::autogenerated(Vec3::new(
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                0.0,
            ))
        })
        .collect()
}

fn pond(from: Vec3, to: Vec3) -> bool {
    let center = Vec3::new(50.0, 50.0, 0.0);
    let segment = to - from;
    let t = ((center - from).dot(segment) / segment.length_squared().max(f32::EPSILON))
        .clamp(0.0, 1.0);
    (from + segment * t).distance(center) > 20.0
}

fn build_bench(c: &mut Criterion) {
    for n in [64, 256] {
        let mut rng = StdRng::seed_from_u64(0);
        let waypoints = scattered_waypoints(n, &mut rng);
        c.bench_function(format!("autogenerate {n} waypoints").as_str(), |b| {
            b.iter(|| black_box(WaypointGraph::build(&waypoints, &pond)))
        });
    }
}

fn search_bench(c: &mut Criterion) {
    for n in [64, 256] {
        let mut rng = StdRng::seed_from_u64(0);
        let graph = WaypointGraph::build(&scattered_waypoints(n, &mut rng), &pond).unwrap();
        let scenarios = (0..100)
            .map(|_| (WaypointId(rng.gen_range(0..n)), WaypointId(rng.gen_range(0..n))))
            .collect::<Vec<_>>();
        let mut finder = PathFinder::default();
        c.bench_function(format!("astar {n} waypoints").as_str(), |b| {
            b.iter(|| {
                for &(start, goal) in &scenarios {
                    let _ = black_box(finder.find_path(&graph, start, goal));
                }
            })
        });
    }
}

criterion_group!(benches, build_bench, search_bench);
criterion_main!(benches);
