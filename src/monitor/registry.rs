//! The ordered set of active monitors.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::events::{EventSender, PresentationEvent};
use super::{Monitor, MonitorId, MonitorOptions, Slot};
use crate::pool::{PoolError, PoolNaming, WorkerPool};
use crate::source::PoolMetrics;

/// Errors raised when adding monitors.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The source is already watched by another monitor.
    #[error("pool '{label}' is already monitored")]
    DuplicateSource { label: String },

    /// A pool created for monitoring failed to start.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// What one reconciliation tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Monitors whose samples were refreshed.
    pub refreshed: Vec<MonitorId>,
    /// Monitors removed because their pool terminated.
    pub removed: Vec<MonitorId>,
}

#[derive(Debug)]
struct Inner {
    monitors: Vec<Monitor>,
    next_id: u64,
}

/// Shared handle to the active monitors, in display order.
///
/// Cloning is cheap; every clone sees the same monitors. The set is mutated
/// only by [`add`](Self::add) and by the removal step of
/// [`reconcile`](Self::reconcile).
#[derive(Debug, Clone)]
pub struct MonitorRegistry {
    inner: Arc<Mutex<Inner>>,
    options: Arc<MonitorOptions>,
    naming: Arc<PoolNaming>,
    events: EventSender,
}

impl MonitorRegistry {
    /// Create an empty registry that reports to `events`.
    pub fn new(options: MonitorOptions, events: EventSender) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                monitors: Vec::new(),
                next_id: 1,
            })),
            options: Arc::new(options),
            naming: Arc::new(PoolNaming::new()),
            events,
        }
    }

    pub fn options(&self) -> &MonitorOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.inner.lock().monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().monitors.is_empty()
    }

    /// Ids of the active monitors, in display order.
    pub fn ids(&self) -> Vec<MonitorId> {
        self.inner.lock().monitors.iter().map(Monitor::id).collect()
    }

    /// Display strings of the active monitors, in display order.
    pub fn describe(&self) -> Vec<String> {
        self.inner
            .lock()
            .monitors
            .iter()
            .map(|m| format!("{}  {}", m, m.caption()))
            .collect()
    }

    /// Start monitoring `source` under `label`.
    ///
    /// The monitor is appended to the display order and the presentation
    /// side is told to attach it and re-pack.
    pub fn add(
        &self,
        label: impl Into<String>,
        source: Arc<dyn PoolMetrics>,
    ) -> Result<MonitorId, MonitorError> {
        let label = label.into();
        let mut inner = self.inner.lock();

        if inner
            .monitors
            .iter()
            .any(|m| Arc::ptr_eq(m.source(), &source))
        {
            return Err(MonitorError::DuplicateSource { label });
        }

        let id = MonitorId(inner.next_id);
        inner.next_id += 1;

        let monitor = Monitor::new(id, label.clone(), source, &self.options);
        self.events.send(PresentationEvent::Attach {
            id,
            label: label.clone(),
            series: monitor.series().clone(),
        });
        self.events.send(PresentationEvent::Caption {
            id,
            text: monitor.caption().to_string(),
        });
        self.events.send(PresentationEvent::Relayout);
        inner.monitors.push(monitor);

        info!(%id, pool = %label, "monitor added");
        Ok(id)
    }

    /// Create a [`WorkerPool`] named by this registry's naming policy and
    /// start monitoring it.
    pub fn named_pool(&self, name: &str, workers: usize) -> Result<Arc<WorkerPool>, MonitorError> {
        let pool = Arc::new(WorkerPool::new(name, workers, &self.naming)?);
        self.add(name, pool.clone())?;
        Ok(pool)
    }

    /// Run one reconciliation tick.
    ///
    /// Terminated monitors are removed (with a detach, then either a
    /// relayout or a collapse when none remain). Live monitors are
    /// refreshed and their new samples staged for the presentation side.
    pub fn reconcile(&self) -> TickReport {
        let mut report = TickReport::default();
        let mut inner = self.inner.lock();
        let snapshot: Vec<MonitorId> = inner.monitors.iter().map(Monitor::id).collect();

        for id in snapshot {
            let Some(pos) = inner.monitors.iter().position(|m| m.id() == id) else {
                continue;
            };

            if inner.monitors[pos].is_terminated() {
                let monitor = inner.monitors.remove(pos);
                self.events.send(PresentationEvent::Detach { id });
                if inner.monitors.is_empty() {
                    self.events.send(PresentationEvent::CollapseToEmpty);
                } else {
                    self.events.send(PresentationEvent::Relayout);
                }
                info!(%id, pool = monitor.label(), "pool terminated, monitor removed");
                report.removed.push(id);
                continue;
            }

            let monitor = &mut inner.monitors[pos];
            match monitor.refresh() {
                Ok(values) => {
                    for (slot, value) in Slot::ALL.into_iter().zip(values) {
                        self.events.send(PresentationEvent::Update { id, slot, value });
                    }
                    self.events.send(PresentationEvent::Caption {
                        id,
                        text: monitor.caption().to_string(),
                    });
                    report.refreshed.push(id);
                }
                Err(e) => warn!(%id, error = %e, "failed to refresh monitor"),
            }
        }

        if !report.removed.is_empty() {
            debug!(remaining = inner.monitors.len(), "registry shrank");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::events::{presentation_channel, EventReceiver};
    use crate::source::FixedSource;

    fn registry() -> (MonitorRegistry, EventReceiver) {
        let (tx, rx) = presentation_channel();
        (MonitorRegistry::new(MonitorOptions::default(), tx), rx)
    }

    fn count<F: Fn(&PresentationEvent) -> bool>(events: &[PresentationEvent], f: F) -> usize {
        events.iter().filter(|e| f(e)).count()
    }

    #[test]
    fn test_add_attaches_and_relayouts() {
        let (registry, mut rx) = registry();
        let id = registry.add("M1", Arc::new(FixedSource::new(15))).unwrap();

        let events = rx.collect_pending();
        assert!(matches!(
            &events[0],
            PresentationEvent::Attach { id: attached, label, series }
                if *attached == id && label == "M1" && series.len() == 3
        ));
        assert_eq!(events.last(), Some(&PresentationEvent::Relayout));
        assert_eq!(registry.ids(), vec![id]);
    }

    #[test]
    fn test_same_source_twice_is_rejected() {
        let (registry, _rx) = registry();
        let source: Arc<dyn PoolMetrics> = Arc::new(FixedSource::new(2));

        registry.add("a", source.clone()).unwrap();
        let err = registry.add("b", source).unwrap_err();
        assert!(matches!(err, MonitorError::DuplicateSource { label } if label == "b"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ids_are_in_insertion_order() {
        let (registry, _rx) = registry();
        let a = registry.add("a", Arc::new(FixedSource::new(1))).unwrap();
        let b = registry.add("b", Arc::new(FixedSource::new(1))).unwrap();
        let c = registry.add("c", Arc::new(FixedSource::new(1))).unwrap();
        assert_eq!(registry.ids(), vec![a, b, c]);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_tick_removes_only_terminated_monitor() {
        let (registry, mut rx) = registry();
        let live = Arc::new(FixedSource::new(15));
        let dying = Arc::new(FixedSource::new(5));
        let live_id = registry.add("live", live.clone()).unwrap();
        let dying_id = registry.add("dying", dying.clone()).unwrap();
        rx.collect_pending();

        live.set_queued(9);
        live.set_active(6);
        dying.terminate();

        let report = registry.reconcile();
        assert_eq!(report.removed, vec![dying_id]);
        assert_eq!(report.refreshed, vec![live_id]);
        assert_eq!(registry.ids(), vec![live_id]);

        let events = rx.collect_pending();
        assert_eq!(
            count(&events, |e| matches!(e, PresentationEvent::Detach { .. })),
            1
        );
        assert_eq!(count(&events, |e| *e == PresentationEvent::Relayout), 1);
        assert_eq!(count(&events, |e| *e == PresentationEvent::CollapseToEmpty), 0);
        assert!(events.contains(&PresentationEvent::Detach { id: dying_id }));
        assert!(events.contains(&PresentationEvent::Update {
            id: live_id,
            slot: Slot::Queued,
            value: 9.0,
        }));
        assert!(events.contains(&PresentationEvent::Update {
            id: live_id,
            slot: Slot::Active,
            value: 6.0,
        }));
    }

    #[test]
    fn test_last_removal_collapses() {
        let (registry, mut rx) = registry();
        let source = Arc::new(FixedSource::new(3));
        let id = registry.add("only", source.clone()).unwrap();
        rx.collect_pending();

        source.terminate();
        let report = registry.reconcile();
        assert_eq!(report.removed, vec![id]);
        assert!(registry.is_empty());

        let events = rx.collect_pending();
        assert_eq!(
            events,
            vec![
                PresentationEvent::Detach { id },
                PresentationEvent::CollapseToEmpty
            ]
        );
    }

    #[test]
    fn test_tick_on_empty_registry_is_quiet() {
        let (registry, mut rx) = registry();
        assert_eq!(registry.reconcile(), TickReport::default());
        assert!(rx.collect_pending().is_empty());
    }

    #[test]
    fn test_refresh_stages_caption() {
        let (registry, mut rx) = registry();
        let source = Arc::new(FixedSource::new(2));
        let id = registry.add("counts", source.clone()).unwrap();
        rx.collect_pending();

        source.set_counts(12_345, 12_000);
        registry.reconcile();

        let events = rx.collect_pending();
        assert!(events.contains(&PresentationEvent::Caption {
            id,
            text: "T: 12,345 C: 12,000".to_string(),
        }));
        assert_eq!(
            registry.describe(),
            vec!["counts: counts 2.00, 0.00, 0.00  T: 12,345 C: 12,000".to_string()]
        );
    }

    #[test]
    fn test_named_pool_is_registered() {
        let (registry, _rx) = registry();
        let pool = registry.named_pool("io", 2).unwrap();
        assert_eq!(registry.len(), 1);

        pool.shutdown();
        pool.join();
        let report = registry.reconcile();
        assert_eq!(report.removed.len(), 1);
        assert!(registry.is_empty());
    }
}
