//! Thread naming policy for worker pools.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out pool numbers so every pool gets a distinct thread-name prefix.
///
/// Threads are named `<name><pool#>-<thread#>`. The pool counter lives here
/// rather than in a global so that independent registries (and tests) do not
/// share numbering.
#[derive(Debug)]
pub struct PoolNaming {
    next_pool: AtomicUsize,
}

impl Default for PoolNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolNaming {
    /// Start numbering pools at 1.
    pub fn new() -> Self {
        Self {
            next_pool: AtomicUsize::new(1),
        }
    }

    /// Reserve the next pool number and build its thread-name prefix.
    pub fn prefix(&self, name: &str) -> String {
        let number = self.next_pool.fetch_add(1, Ordering::Relaxed);
        format!("{}{}-", name, number)
    }
}

/// Per-pool thread counter, numbering threads from 1.
#[derive(Debug)]
pub(crate) struct ThreadNames {
    prefix: String,
    next_thread: AtomicUsize,
}

impl ThreadNames {
    pub(crate) fn new(prefix: String) -> Self {
        Self {
            prefix,
            next_thread: AtomicUsize::new(1),
        }
    }

    pub(crate) fn next(&self) -> String {
        let number = self.next_thread.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, number)
    }
}
