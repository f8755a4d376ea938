//! Background task that runs reconciliation ticks on a fixed period.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::MonitorRegistry;

/// Default period between reconciliation ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Spawns the reconciliation task for a registry.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use poolwatch::{presentation_channel, MonitorOptions, MonitorRegistry, ReconcileLoop};
///
/// # tokio_test::block_on(async {
/// let (tx, _rx) = presentation_channel();
/// let registry = MonitorRegistry::new(MonitorOptions::default(), tx);
/// let handle = ReconcileLoop::spawn(registry, Duration::from_millis(100));
/// handle.stop();
/// handle.join().await;
/// # });
/// ```
#[derive(Debug)]
pub struct ReconcileLoop;

impl ReconcileLoop {
    /// Start ticking `registry` every `interval` on the current tokio runtime.
    ///
    /// The first tick runs immediately. The loop runs until
    /// [`LoopHandle::stop`] is called or the handle is dropped.
    pub fn spawn(registry: MonitorRegistry, interval: Duration) -> LoopHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_ms = interval.as_millis() as u64, "reconciliation loop started");

            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let report = registry.reconcile();
                        if !report.removed.is_empty() {
                            debug!(removed = report.removed.len(), "tick removed monitors");
                        }
                    }
                }
            }

            info!("reconciliation loop stopped");
        });

        LoopHandle { stop_tx, task }
    }
}

/// Controls a running reconciliation loop. Dropping it stops the loop.
#[derive(Debug)]
pub struct LoopHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl LoopHandle {
    /// Ask the loop to exit. It finishes the tick in progress, if any, and
    /// starts no new one.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop task to exit.
    pub async fn join(self) {
        let LoopHandle { stop_tx, task } = self;
        let _ = task.await;
        drop(stop_tx);
    }
}
