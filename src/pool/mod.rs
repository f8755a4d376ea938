//! A bounded worker pool that reports its own metrics.
//!
//! [`WorkerPool`] runs jobs on a fixed number of named OS threads fed from a
//! FIFO queue. It implements [`PoolMetrics`] so it can be watched by a
//! [`Monitor`](crate::monitor::Monitor).
//!
//! ```
//! use std::sync::Arc;
//! use poolwatch::{PoolMetrics, PoolNaming, WorkerPool};
//!
//! let naming = PoolNaming::new();
//! let pool = WorkerPool::new("io", 2, &naming).unwrap();
//! pool.submit(|| {}).unwrap();
//! pool.shutdown();
//! pool.join();
//! assert!(pool.is_terminated());
//! assert_eq!(pool.completed_count(), 1);
//! ```

mod naming;

pub use naming::PoolNaming;

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

use crate::source::PoolMetrics;
use naming::ThreadNames;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errors raised by [`WorkerPool`].
#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool no longer accepts jobs.
    #[error("pool has been shut down")]
    Shutdown,

    /// A worker thread could not be started.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// State shared between the pool handle and its workers.
#[derive(Default)]
struct Shared {
    queue: Mutex<VecDeque<Job>>,
    available: Condvar,
    shutdown: AtomicBool,
    active: AtomicUsize,
    submitted: AtomicU64,
    completed: AtomicU64,
}

impl Shared {
    /// Refuse new jobs and wake idle workers so they can exit once the
    /// queue is empty. Returns true on the first call.
    fn close(&self) -> bool {
        let _queue = self.queue.lock();
        let first = !self.shutdown.swap(true, Ordering::AcqRel);
        self.available.notify_all();
        first
    }
}

/// Fixed-size pool of named worker threads.
pub struct WorkerPool {
    name: String,
    capacity: usize,
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

impl WorkerPool {
    /// Start a pool with `workers` threads named by `naming`.
    pub fn new(name: &str, workers: usize, naming: &PoolNaming) -> Result<Self, PoolError> {
        let shared = Arc::new(Shared::default());
        let names = ThreadNames::new(naming.prefix(name));

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let worker = shared.clone();
            let spawned = std::thread::Builder::new()
                .name(names.next())
                .spawn(move || work(&worker));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Let the threads that did start exit.
                    shared.close();
                    return Err(e.into());
                }
            }
        }

        debug!(pool = name, workers, "worker pool started");
        Ok(Self {
            name: name.to_string(),
            capacity: workers,
            shared,
            workers: Mutex::new(handles),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue a job. Fails once [`shutdown`](Self::shutdown) was called.
    pub fn submit<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut queue = self.shared.queue.lock();
        if self.shared.shutdown.load(Ordering::Acquire) {
            return Err(PoolError::Shutdown);
        }
        queue.push_back(Box::new(job));
        self.shared.submitted.fetch_add(1, Ordering::Relaxed);
        drop(queue);
        self.shared.available.notify_one();
        Ok(())
    }

    /// Stop accepting jobs. Jobs already queued still run.
    pub fn shutdown(&self) {
        if self.shared.close() {
            debug!(pool = %self.name, "worker pool shutting down");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.shutdown.load(Ordering::Acquire)
    }

    /// Block until every worker thread has exited. Only returns after
    /// [`shutdown`](Self::shutdown).
    pub fn join(&self) {
        let handles: Vec<_> = self.workers.lock().drain(..).collect();
        for handle in handles {
            if handle.join().is_err() {
                warn!(pool = %self.name, "worker thread panicked");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl PoolMetrics for WorkerPool {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn queued_count(&self) -> usize {
        self.shared.queue.lock().len()
    }

    fn active_count(&self) -> usize {
        self.shared.active.load(Ordering::Acquire)
    }

    fn submitted_count(&self) -> u64 {
        self.shared.submitted.load(Ordering::Relaxed)
    }

    fn completed_count(&self) -> u64 {
        self.shared.completed.load(Ordering::Relaxed)
    }

    fn is_terminated(&self) -> bool {
        // Workers bump `active` while holding the queue lock, so an empty
        // queue plus zero active under the lock means fully drained.
        let queue = self.shared.queue.lock();
        self.shared.shutdown.load(Ordering::Acquire)
            && queue.is_empty()
            && self.shared.active.load(Ordering::Acquire) == 0
    }
}

fn work(shared: &Shared) {
    loop {
        let job = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(job) = queue.pop_front() {
                    shared.active.fetch_add(1, Ordering::AcqRel);
                    break job;
                }
                if shared.shutdown.load(Ordering::Acquire) {
                    return;
                }
                shared.available.wait(&mut queue);
            }
        };

        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            warn!("job panicked");
        }

        shared.completed.fetch_add(1, Ordering::Relaxed);
        shared.active.fetch_sub(1, Ordering::AcqRel);
    }
}
