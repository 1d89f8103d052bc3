use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, SimulationConfig};
use crate::echo::{validate_catalog, CatalogError, Echo, Rng};
use crate::parallel::{batch_ranges, WorkerPool};
use crate::simulation::trial::{record_outcome, run_trial, ResourceTotals, SimStats};

/// Trials per batch. Each batch owns one random stream and one local accumulator.
pub const BATCH_SIZE: u64 = 1 << 16;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to draw a seed from OS entropy: {0}")]
    Entropy(getrandom::Error),
}

/// Aggregate totals for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    pub iterations: u64,
    pub success_count: u64,
    /// Kept exp plus the refunded share of abandoned exp.
    pub total_exp: u64,
    /// Kept tuners plus the refunded share of abandoned tuners.
    pub total_tuners: u64,
    pub seed: u64,
    pub kept: ResourceTotals,
    pub abandoned: ResourceTotals,
    /// Abandoned trials per gate, first to final.
    pub aborted_at: [u64; 4],
}

impl SimulationResult {
    pub fn from_stats(seed: u64, stats: &SimStats) -> Self {
        Self {
            iterations: stats.trials,
            success_count: stats.success_count,
            total_exp: stats.kept.exp + stats.abandoned.exp,
            total_tuners: stats.kept.tuners + stats.abandoned.tuners,
            seed,
            kept: stats.kept,
            abandoned: stats.abandoned,
            aborted_at: stats.aborted_at,
        }
    }
}

/// Global totals. Written once per batch, never per trial.
#[derive(Debug, Default)]
struct AtomicTotals {
    trials: AtomicU64,
    success_count: AtomicU64,
    kept_exp: AtomicU64,
    kept_tuners: AtomicU64,
    abandoned_exp: AtomicU64,
    abandoned_tuners: AtomicU64,
    aborted_at: [AtomicU64; 4],
}

impl AtomicTotals {
    fn absorb(&self, stats: &SimStats) {
        self.trials.fetch_add(stats.trials, Ordering::Relaxed);
        self.success_count
            .fetch_add(stats.success_count, Ordering::Relaxed);
        self.kept_exp.fetch_add(stats.kept.exp, Ordering::Relaxed);
        self.kept_tuners.fetch_add(stats.kept.tuners, Ordering::Relaxed);
        self.abandoned_exp
            .fetch_add(stats.abandoned.exp, Ordering::Relaxed);
        self.abandoned_tuners
            .fetch_add(stats.abandoned.tuners, Ordering::Relaxed);
        for (total, &count) in self.aborted_at.iter().zip(&stats.aborted_at) {
            total.fetch_add(count, Ordering::Relaxed);
        }
    }

    fn into_stats(self) -> SimStats {
        let [first, second, third, last] = self.aborted_at;
        SimStats {
            trials: self.trials.into_inner(),
            success_count: self.success_count.into_inner(),
            kept: ResourceTotals {
                exp: self.kept_exp.into_inner(),
                tuners: self.kept_tuners.into_inner(),
            },
            abandoned: ResourceTotals {
                exp: self.abandoned_exp.into_inner(),
                tuners: self.abandoned_tuners.into_inner(),
            },
            aborted_at: [
                first.into_inner(),
                second.into_inner(),
                third.into_inner(),
                last.into_inner(),
            ],
        }
    }
}

/// Run `trials` trials on a reused echo with the stream for batch `index`.
pub fn run_batch(echo: &mut Echo, seed: u64, index: u64, trials: u64) -> SimStats {
    let mut rng = Rng::for_batch(seed, index);
    let mut stats = SimStats::default();
    for _ in 0..trials {
        let outcome = run_trial(echo, &mut rng);
        record_outcome(&mut stats, echo, outcome);
    }
    stats
}

/// Seed for runs that did not ask for one.
pub fn entropy_seed() -> Result<u64, SimulationError> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).map_err(SimulationError::Entropy)?;
    Ok(u64::from_le_bytes(bytes))
}

fn prepare(config: &SimulationConfig) -> Result<(u64, Vec<(u64, u64)>), SimulationError> {
    validate_catalog()?;
    config.validate()?;
    let seed = match config.seed {
        Some(seed) => seed,
        None => entropy_seed()?,
    };
    let ranges = batch_ranges(config.iterations, BATCH_SIZE);
    debug!(batches = ranges.len(), batch_size = BATCH_SIZE, "partitioned trials");
    Ok((seed, ranges))
}

/// Run every trial across the worker pool.
///
/// For a given seed the totals do not depend on the worker count: random streams are
/// tied to batch indices, and merging is plain addition.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
    let (seed, ranges) = prepare(config)?;
    let pool = WorkerPool::with_workers(config.workers);
    info!(
        iterations = config.iterations,
        seed,
        workers = pool.effective_workers(),
        "starting simulation"
    );

    let totals = AtomicTotals::default();
    pool.install(|| {
        ranges
            .par_iter()
            .enumerate()
            .for_each_init(Echo::new, |echo, (index, &(start, end))| {
                let stats = run_batch(echo, seed, index as u64, end - start);
                totals.absorb(&stats);
            });
    })?;

    let result = SimulationResult::from_stats(seed, &totals.into_stats());
    info!(success_count = result.success_count, "simulation finished");
    Ok(result)
}

/// Single-threaded run with the same batch layout as [run_simulation].
pub fn run_simulation_sequential(
    config: &SimulationConfig,
) -> Result<SimulationResult, SimulationError> {
    let (seed, ranges) = prepare(config)?;
    info!(iterations = config.iterations, seed, "starting sequential simulation");

    let mut echo = Echo::new();
    let mut totals = SimStats::default();
    for (index, &(start, end)) in ranges.iter().enumerate() {
        totals.merge(&run_batch(&mut echo, seed, index as u64, end - start));
    }

    Ok(SimulationResult::from_stats(seed, &totals))
}
