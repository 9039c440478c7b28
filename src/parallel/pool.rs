//! Rayon thread pool configuration for archetype scoring.
//!
//! Use [WorkerPool::install] to score archetypes with a fixed number of threads, or rely on
//! Rayon's default (all CPU cores).

use rayon::ThreadPoolBuilder;

use crate::error::AnalysisError;

/// How many worker threads score archetypes in parallel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use the global Rayon pool (num_cpus).
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

    /// Run a closure with this worker count. If [workers](WorkerPool::workers) is 0 the closure
    /// runs on the global pool; otherwise a temporary pool with that many threads is built.
    pub fn install<F, R>(&self, f: F) -> Result<R, AnalysisError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|err| AnalysisError::ThreadPool(err.to_string()))?;
        Ok(pool.install(f))
    }
}

#[cfg(test)]
mod tests {
    use rayon::prelude::*;

    use super::*;

    #[test]
    fn dedicated_pool_uses_requested_threads() {
        let threads = WorkerPool::with_workers(2)
            .install(rayon::current_num_threads)
            .unwrap();
        assert_eq!(threads, 2);
    }

    #[test]
    fn default_pool_runs_closure() {
        let sum: u64 = WorkerPool::default_workers()
            .install(|| (1..=100u64).into_par_iter().sum())
            .unwrap();
        assert_eq!(sum, 5050);
    }
}
