//! Hand-off of monitor changes to the presentation thread.
//!
//! The reconciliation loop sends [`PresentationEvent`]s through an unbounded
//! channel. The presentation thread owns the only receiver and applies the
//! events to its [`PresentationSink`] once per frame, so visual state is only
//! ever mutated on that thread.

use tokio::sync::mpsc;
use tracing::trace;

use super::{MonitorId, Slot};
use crate::data::StatusSeries;

/// A change staged by the registry for the presentation thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    /// A new indicator with its initial series.
    Attach {
        id: MonitorId,
        label: String,
        series: StatusSeries,
    },
    /// Remove an indicator.
    Detach { id: MonitorId },
    /// New value for one slot of an indicator.
    Update {
        id: MonitorId,
        slot: Slot,
        value: f64,
    },
    /// New submitted/completed caption for an indicator.
    Caption { id: MonitorId, text: String },
    /// Re-pack the remaining indicators.
    Relayout,
    /// No indicators remain; shrink to the placeholder.
    CollapseToEmpty,
}

/// Presentation-side owner of indicator state.
pub trait PresentationSink {
    fn attach(&mut self, id: MonitorId, label: String, series: StatusSeries);

    fn detach(&mut self, id: MonitorId);

    fn update(&mut self, id: MonitorId, slot: Slot, value: f64);

    fn caption(&mut self, id: MonitorId, text: String);

    fn request_relayout(&mut self);

    fn request_collapse_to_empty(&mut self);
}

impl PresentationEvent {
    /// Dispatch this event onto a sink.
    pub fn apply<S: PresentationSink + ?Sized>(self, sink: &mut S) {
        match self {
            PresentationEvent::Attach { id, label, series } => sink.attach(id, label, series),
            PresentationEvent::Detach { id } => sink.detach(id),
            PresentationEvent::Update { id, slot, value } => sink.update(id, slot, value),
            PresentationEvent::Caption { id, text } => sink.caption(id, text),
            PresentationEvent::Relayout => sink.request_relayout(),
            PresentationEvent::CollapseToEmpty => sink.request_collapse_to_empty(),
        }
    }
}

/// Create the channel between a registry and its presentation thread.
pub fn presentation_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Producer half, held by the registry.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<PresentationEvent>,
}

impl EventSender {
    /// Stage an event. Dropped silently once the presentation side is gone.
    pub fn send(&self, event: PresentationEvent) {
        if self.tx.send(event).is_err() {
            trace!("presentation receiver closed, event dropped");
        }
    }
}

/// Consumer half, owned by the presentation thread.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<PresentationEvent>,
}

impl EventReceiver {
    /// Apply every event staged so far to `sink`, without blocking.
    ///
    /// Returns the number of events applied.
    pub fn drain<S: PresentationSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            event.apply(sink);
            applied += 1;
        }
        applied
    }

    /// Take every staged event without applying it.
    pub fn collect_pending(&mut self) -> Vec<PresentationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
