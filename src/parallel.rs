//! Fixed-size worker pool with order-preserving parallel map.
//!
//! The search fans out three kinds of independent work per generation
//! (construction, mutation, evaluation) and joins the results in task
//! order. Downstream steps zip results back onto population members by
//! position, so [`WorkerPool::map`] guarantees `output[i]` is the result
//! for `input[i]` regardless of which worker ran it or when it finished.
//!
//! Tasks receive shared references only and return owned values; no task
//! observes another's output.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{TtpError, TtpResult};

/// A dedicated rayon pool of `workers` threads.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Creates a pool with `workers` threads (at least one).
    pub fn new(workers: usize) -> TtpResult<Self> {
        if workers == 0 {
            return Err(TtpError::InvalidConfig(
                "worker count must be at least 1".into(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ttp-worker-{i}"))
            .build()
            .map_err(|e| TtpError::ThreadPool(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Applies `f(index, item)` to every input in parallel.
    ///
    /// The result vector is in input order.
    pub fn map<T, U, F>(&self, inputs: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(usize, &T) -> U + Sync + Send,
    {
        self.pool.install(|| {
            inputs
                .par_iter()
                .enumerate()
                .map(|(i, item)| f(i, item))
                .collect()
        })
    }

    /// Runs `f(index)` for `0..len` in parallel; results are in index order.
    pub fn map_range<U, F>(&self, len: usize, f: F) -> Vec<U>
    where
        U: Send,
        F: Fn(usize) -> U + Sync + Send,
    {
        self.pool
            .install(|| (0..len).into_par_iter().map(&f).collect())
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_map_preserves_order() {
        let pool = WorkerPool::new(4).unwrap();
        let inputs: Vec<u64> = (0..500).collect();
        let out = pool.map(&inputs, |i, &x| (i, x * 2));
        for (i, &(idx, doubled)) in out.iter().enumerate() {
            assert_eq!(idx, i);
            assert_eq!(doubled, 2 * i as u64);
        }
    }

    #[test]
    fn test_order_survives_uneven_task_times() {
        let pool = WorkerPool::new(4).unwrap();
        // Early tasks are the slowest, so they finish last.
        let out = pool.map_range(16, |i| {
            thread::sleep(Duration::from_millis((16 - i as u64) * 2));
            i
        });
        assert_eq!(out, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_fallible_tasks_collect_in_order() {
        let pool = WorkerPool::new(2).unwrap();
        let results: Vec<Result<usize, String>> = pool.map_range(8, |i| {
            if i == 5 {
                Err(format!("task {i}"))
            } else {
                Ok(i)
            }
        });
        let collected: Result<Vec<usize>, String> = results.into_iter().collect();
        assert_eq!(collected.unwrap_err(), "task 5");
    }

    #[test]
    fn test_worker_count() {
        let pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.workers(), 3);
        assert!(WorkerPool::new(0).is_err());
    }
}
