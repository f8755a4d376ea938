//! Settable metrics source.
//!
//! Holds metric values in atomics so a caller can script a pool's state.
//! Useful for embedding pools that keep their own counters, and for tests.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use super::PoolMetrics;

/// A [`PoolMetrics`] whose values are set explicitly.
#[derive(Debug, Default)]
pub struct FixedSource {
    capacity: AtomicUsize,
    queued: AtomicUsize,
    active: AtomicUsize,
    submitted: AtomicU64,
    completed: AtomicU64,
    terminated: AtomicBool,
}

impl FixedSource {
    /// Create a live source with the given capacity and nothing queued.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: AtomicUsize::new(capacity),
            ..Default::default()
        }
    }

    pub fn set_capacity(&self, capacity: usize) {
        self.capacity.store(capacity, Ordering::Relaxed);
    }

    pub fn set_queued(&self, queued: usize) {
        self.queued.store(queued, Ordering::Relaxed);
    }

    pub fn set_active(&self, active: usize) {
        self.active.store(active, Ordering::Relaxed);
    }

    /// Set the cumulative submitted and completed counters.
    pub fn set_counts(&self, submitted: u64, completed: u64) {
        self.submitted.store(submitted, Ordering::Relaxed);
        self.completed.store(completed, Ordering::Relaxed);
    }

    /// Mark the source terminated. There is no way back.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::Release);
    }
}

impl PoolMetrics for FixedSource {
    fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Relaxed)
    }

    fn queued_count(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }

    fn active_count(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    fn submitted_count(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    fn completed_count(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }
}
