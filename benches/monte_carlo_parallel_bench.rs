//! Compare sequential vs parallel simulation run times.
//!
//! Run with: `cargo bench --bench monte_carlo_parallel`
//! Or quick comparison: `cargo run --release --bin benchmark_parallel_speedup` (see src/bin)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use echo_solver::config::SimulationConfig;
use echo_solver::simulation::{run_simulation, run_simulation_sequential};

fn bench_monte_carlo_sequential_vs_parallel(c: &mut Criterion) {
    let config = SimulationConfig::default()
        .with_iterations(1_000_000)
        .with_seed(42);

    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(run_simulation_sequential(&config).expect("sequential run")));
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(run_simulation(&config).expect("parallel run")));
    });

    group.finish();
}

criterion_group!(benches, bench_monte_carlo_sequential_vs_parallel);
criterion_main!(benches);
