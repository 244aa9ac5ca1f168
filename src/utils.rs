//! Parallelism plumbing and atomic f64 helpers shared by the drivers.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// Components don't manage thread pools; the pool is set up once at the
/// driver entry via [`run_with_threads`] and components only consult this
/// flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if the rayon pool has multiple threads)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Number of workers a strided row partition should assume.
    #[inline]
    pub fn n_workers(self) -> usize {
        match self {
            Parallelism::Sequential => 1,
            Parallelism::Parallel => rayon::current_num_threads(),
        }
    }

    /// Parallel for_each with per-worker initialization.
    ///
    /// The `init` closure runs once per worker thread (in parallel mode) or
    /// once total (in sequential mode); the resulting state is passed to `f`
    /// and reused across items on the same thread. Used for the per-worker
    /// encode/weight scratch buffers.
    #[inline]
    pub fn maybe_par_for_each_init<T, I, INIT, S, F>(self, iter: I, init: INIT, f: F)
    where
        T: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        INIT: Fn() -> S + Sync + Send,
        F: Fn(&mut S, T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().for_each_init(init, f);
        } else {
            let mut state = init();
            iter.into_iter().for_each(|item| f(&mut state, item));
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
#[inline]
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    let parallelism = Parallelism::from_threads(n_threads);

    match parallelism {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n_threads)
                .build()
                .expect("Failed to create thread pool");
            pool.install(|| f(Parallelism::Parallel))
        }
    }
}

// =============================================================================
// Atomic f64 Cells
// =============================================================================

/// Read an f64 stored as bits in an atomic cell.
#[inline]
pub(crate) fn load_f64(cell: &AtomicU64) -> f64 {
    f64::from_bits(cell.load(Ordering::Relaxed))
}

/// Write an f64 as bits into an atomic cell.
#[inline]
pub(crate) fn store_f64(cell: &AtomicU64, value: f64) {
    cell.store(value.to_bits(), Ordering::Relaxed);
}

/// Atomically add `delta` to an f64 cell, returning the new total.
///
/// Compare-exchange loop; the only synchronized accumulation in the crate
/// (the per-epoch loss total).
#[inline]
pub(crate) fn atomic_add_f64(cell: &AtomicU64, delta: f64) -> f64 {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        let next = f64::from_bits(current) + delta;
        match cell.compare_exchange_weak(
            current,
            next.to_bits(),
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return next,
            Err(actual) => current = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallelism_from_threads() {
        assert!(Parallelism::from_threads(0).is_parallel() || rayon::current_num_threads() == 1);
        assert!(!Parallelism::from_threads(1).is_parallel());
        assert!(Parallelism::from_threads(2).is_parallel());
    }

    #[test]
    fn sequential_has_one_worker() {
        assert_eq!(Parallelism::Sequential.n_workers(), 1);
    }

    #[test]
    fn run_with_threads_explicit() {
        let threads = run_with_threads(2, |_| rayon::current_num_threads());
        assert_eq!(threads, 2);
    }

    #[test]
    fn for_each_init_covers_all_items() {
        let total = AtomicU64::new(0);
        Parallelism::Parallel.maybe_par_for_each_init(
            0..100u64,
            || (),
            |_, item| {
                total.fetch_add(item, Ordering::Relaxed);
            },
        );
        assert_eq!(total.load(Ordering::Relaxed), 4950);

        let total = AtomicU64::new(0);
        Parallelism::Sequential.maybe_par_for_each_init(
            0..100u64,
            || (),
            |_, item| {
                total.fetch_add(item, Ordering::Relaxed);
            },
        );
        assert_eq!(total.load(Ordering::Relaxed), 4950);
    }

    #[test]
    fn atomic_f64_roundtrip_and_add() {
        let cell = AtomicU64::new(0f64.to_bits());
        store_f64(&cell, 1.5);
        assert_eq!(load_f64(&cell), 1.5);
        assert_eq!(atomic_add_f64(&cell, 0.25), 1.75);
        assert_eq!(load_f64(&cell), 1.75);
    }
}
