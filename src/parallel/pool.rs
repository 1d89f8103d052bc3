//! Rayon thread pool configuration for simulation workloads.
//!
//! Use [WorkerPool::install] to run trials with a fixed number of threads, or rely on
//! Rayon's default (all CPU cores).

use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};

/// Configures how many worker threads are used for parallel batch execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use all available CPU cores (Rayon default).
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Threads that [install](WorkerPool::install) will run on.
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            rayon::current_num_threads()
        } else {
            self.workers
        }
    }

    /// Run a closure on a thread pool with this worker count. If [workers](WorkerPool::workers) is 0,
    /// uses the global Rayon pool (all cores). Otherwise builds a temporary pool with that many threads.
    pub fn install<F, R>(&self, f: F) -> Result<R, ThreadPoolBuildError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            Ok(f())
        } else {
            let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
            Ok(pool.install(f))
        }
    }
}
