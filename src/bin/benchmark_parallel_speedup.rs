//! Run the simulation once sequentially and once in parallel, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup [iterations]

use std::env;
use std::time::Instant;

use echo_solver::config::SimulationConfig;
use echo_solver::simulation::{run_simulation, run_simulation_sequential, SimulationResult};

fn timed(
    label: &str,
    iterations: u64,
    run: impl FnOnce() -> Result<SimulationResult, echo_solver::simulation::SimulationError>,
) -> Option<(SimulationResult, f64)> {
    let t0 = Instant::now();
    match run() {
        Ok(result) => {
            let elapsed = t0.elapsed();
            let ms = elapsed.as_secs_f64() * 1000.0;
            println!(
                "{label:<12} {ms:.2} ms  ({:.1} trials/s)",
                iterations as f64 / elapsed.as_secs_f64()
            );
            Some((result, ms))
        }
        Err(err) => {
            eprintln!("{label} run failed: {err}");
            None
        }
    }
}

fn main() {
    let iterations = env::args()
        .nth(1)
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(5_000_000);
    let config = SimulationConfig::default()
        .with_iterations(iterations)
        .with_seed(12345);

    println!("Echo simulation: {iterations} trials (seed=12345)");
    println!();

    let Some((results_seq, seq_ms)) =
        timed("Sequential:", iterations, || run_simulation_sequential(&config))
    else {
        return;
    };
    let Some((results_par, par_ms)) = timed("Parallel:", iterations, || run_simulation(&config))
    else {
        return;
    };

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    assert_eq!(results_seq, results_par, "sequential and parallel totals differ");
    println!("(Results match sequential vs parallel)");
}
