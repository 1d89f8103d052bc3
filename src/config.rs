//! Run configuration: trial count, optional seed and worker count.

use std::env;

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_ITERATIONS: u64 = 100_000_000;

/// Overrides the worker count when `--workers` is not given.
pub const WORKERS_ENV: &str = "ECHO_SOLVER_WORKERS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("iteration count must be positive")]
    ZeroIterations,
    #[error("invalid worker count '{0}'")]
    InvalidWorkers(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationConfig {
    pub iterations: u64,
    /// `None` draws a seed from OS entropy at run start.
    pub seed: Option<u64>,
    /// 0 means one worker per available core.
    pub workers: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            workers: 0,
        }
    }
}

impl SimulationConfig {
    pub fn with_iterations(self, iterations: u64) -> Self {
        Self { iterations, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn with_workers(self, workers: usize) -> Self {
        Self { workers, ..self }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }
}

pub fn parse_workers(raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidWorkers(raw.to_string()))
}

/// Worker count from [`WORKERS_ENV`], if set.
pub fn workers_from_env() -> Result<Option<usize>, ConfigError> {
    match env::var(WORKERS_ENV) {
        Ok(raw) => parse_workers(&raw).map(Some),
        Err(_) => Ok(None),
    }
}
