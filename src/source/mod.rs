//! Pool metrics source abstraction.
//!
//! A monitor only ever reads from the pool it watches. Anything that can
//! report its capacity, queue depth, active workers, cumulative counters and
//! liveness can be monitored by implementing [`PoolMetrics`].

mod fixed;

pub use fixed::FixedSource;

use std::fmt::Debug;

/// Read-only view of a bounded worker pool.
///
/// Implementations must be cheap to call and non-blocking: the
/// reconciliation loop calls every method once per tick.
///
/// # Example
///
/// ```
/// use poolwatch::{FixedSource, PoolMetrics};
///
/// let source = FixedSource::new(15);
/// source.set_queued(4);
/// assert_eq!(source.capacity(), 15);
/// assert_eq!(source.queued_count(), 4);
/// assert!(!source.is_terminated());
/// ```
pub trait PoolMetrics: Send + Sync + Debug {
    /// Number of workers the pool keeps.
    fn capacity(&self) -> usize;

    /// Jobs waiting for a worker.
    fn queued_count(&self) -> usize;

    /// Workers currently running a job.
    fn active_count(&self) -> usize;

    /// Jobs ever submitted.
    fn submitted_count(&self) -> u64;

    /// Jobs ever completed.
    fn completed_count(&self) -> u64;

    /// True once the pool has shut down and drained. Never reverts.
    fn is_terminated(&self) -> bool;
}
