use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rs_nbody::forces::{acceleration_on, ForceMode};
use rs_nbody::models::{BodyId, PointMass, Vector2};
use rs_nbody::simulation::{Preset, Simulation};
use rs_nbody::spatial::{QuadTree, Rect};
use rs_nbody::utils::SimulationConfig;

fn random_cloud(count: u64) -> Vec<PointMass> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|i| PointMass {
            id: BodyId(i),
            position: Vector2::new(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0)),
            mass: rng.random_range(1.0e26..1.0e28),
        })
        .collect()
}

pub fn bench_force_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_modes");
    group.measurement_time(std::time::Duration::from_secs(5));
    group.sample_size(50);
    let config = SimulationConfig::default();

    for count in [16_u64, 128, 1024] {
        let bodies = random_cloud(count);
        let boundary = Rect::bounding_square(bodies.iter().map(|b| b.position), 0.05).unwrap();

        group.bench_with_input(BenchmarkId::new("direct", count), &bodies, |b, bodies| b.iter(|| {
            let mut sum = Vector2::ZERO;
            for body in bodies {
                sum += acceleration_on(body, body.position, bodies, &ForceMode::Direct, &config);
            }
            black_box(sum)
        }));

        group.bench_with_input(BenchmarkId::new("tree", count), &bodies, |b, bodies| b.iter(|| {
            let tree = QuadTree::build(boundary, 4, bodies).unwrap();
            let mode = ForceMode::TreeApproximate(&tree);
            let mut sum = Vector2::ZERO;
            for body in bodies {
                sum += acceleration_on(body, body.position, bodies, &mode, &config);
            }
            black_box(sum)
        }));
    }
    group.finish();
}

pub fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames");
    group.sample_size(20);

    for preset in [Preset::Solar, Preset::Spiral] {
        group.bench_function(preset.key(), |b| {
            let mut sim = Simulation::new();
            sim.load(preset).unwrap();
            b.iter(|| sim.advance_frame())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_force_modes, bench_frames);
criterion_main!(benches);
