//! Pool monitors and the loop that keeps them current.
//!
//! ## Architecture
//!
//! ```text
//!  ┌──────────────────────── background (tokio) ───────────────────────┐
//!  │ ReconcileLoop ──tick──▶ MonitorRegistry::reconcile()               │
//!  │                            │  refresh() / is_terminated()          │
//!  │                            ▼                                       │
//!  │                     Monitor ──reads──▶ dyn PoolMetrics             │
//!  └────────────────────────────┬───────────────────────────────────────┘
//!                               │ PresentationEvent (mpsc, one consumer)
//!  ┌────────────────────────────▼── presentation thread ────────────────┐
//!  │ EventReceiver::drain() ──▶ PresentationSink (Board) ──▶ Renderer   │
//!  └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop never touches presentation state. It stages samples and layout
//! requests as [`PresentationEvent`]s which the presentation thread applies
//! once per frame.
//!
//! A monitor without alert or warning fractions carries no threshold at all.
//! Its bars use the series' flat bar color and it shows grid lines instead
//! of cut points. Builds that always attach an empty threshold would paint
//! such bars in the "good" color with no grid; configure a fraction to get
//! that look.

mod events;
mod reconcile;
mod registry;

pub use events::{presentation_channel, EventReceiver, EventSender, PresentationEvent, PresentationSink};
pub use reconcile::{LoopHandle, ReconcileLoop};
pub use registry::{MonitorError, MonitorRegistry, TickReport};

use std::fmt;
use std::sync::Arc;

use crate::data::format::group_thousands;
use crate::data::{Orientation, SeriesError, StatusSeries, ThresholdSet};
use crate::source::PoolMetrics;

/// Grid spacing used by monitors when no threshold is configured.
pub const DEFAULT_GRID_SPACING: u32 = 20;

/// Identifies a monitor for its whole life. Never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorId(pub u64);

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which pool metric a bar shows. The position in the series is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Capacity,
    Queued,
    Active,
}

impl Slot {
    /// All slots in display order.
    pub const ALL: [Slot; 3] = [Slot::Capacity, Slot::Queued, Slot::Active];

    /// Sample index of this slot in a monitor's series.
    pub fn index(self) -> usize {
        match self {
            Slot::Capacity => 0,
            Slot::Queued => 1,
            Slot::Active => 2,
        }
    }
}

/// Policy applied to every monitor a registry creates.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorOptions {
    /// Axis ceiling as a multiple of the pool capacity. Values above 1 leave headroom.
    pub scale: f64,
    /// Alert cut point as a fraction of the axis ceiling.
    pub alert: Option<f64>,
    /// Warning cut point as a fraction of the axis ceiling.
    pub warning: Option<f64>,
    /// Grid line spacing, drawn only when no threshold is attached.
    pub grid_spacing: Option<u32>,
    pub orientation: Orientation,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            alert: None,
            warning: None,
            grid_spacing: Some(DEFAULT_GRID_SPACING),
            orientation: Orientation::Vertical,
        }
    }
}

/// Binds one [`StatusSeries`] to one pool.
///
/// The series always holds exactly three samples, in [`Slot`] order.
#[derive(Debug)]
pub struct Monitor {
    id: MonitorId,
    label: String,
    series: StatusSeries,
    caption: String,
    source: Arc<dyn PoolMetrics>,
}

impl Monitor {
    /// Build a monitor and seed its series from the current pool state.
    ///
    /// The axis is fixed at `capacity * scale`; configured fractions become
    /// absolute cut points relative to that axis.
    pub fn new(
        id: MonitorId,
        label: impl Into<String>,
        source: Arc<dyn PoolMetrics>,
        options: &MonitorOptions,
    ) -> Self {
        let label = label.into();
        let capacity = source.capacity() as f64;

        let mut series = StatusSeries::new(options.orientation, label.clone());
        series.set_grid_spacing(options.grid_spacing);
        series.set_adjustable(false);
        series.set_axis_max(capacity * options.scale);
        series.add_value(capacity);
        series.add_value(source.queued_count() as f64);
        series.add_value(source.active_count() as f64);

        if options.alert.is_some() || options.warning.is_some() {
            let axis = series.axis_max();
            let mut threshold = ThresholdSet::empty();
            threshold.set_alert(options.alert.map(|f| axis * f));
            threshold.set_warning(options.warning.map(|f| axis * f));
            series.set_threshold(Some(threshold));
        }

        let caption = counts_caption(source.as_ref());
        Self {
            id,
            label,
            series,
            caption,
            source,
        }
    }

    pub fn id(&self) -> MonitorId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn series(&self) -> &StatusSeries {
        &self.series
    }

    /// Submitted/completed caption shown under the bars.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn source(&self) -> &Arc<dyn PoolMetrics> {
        &self.source
    }

    /// True once the pool has shut down and drained.
    pub fn is_terminated(&self) -> bool {
        self.source.is_terminated()
    }

    /// Pull the current metrics into the series and caption.
    ///
    /// Returns the new slot values in [`Slot::ALL`] order.
    pub fn refresh(&mut self) -> Result<[f64; 3], SeriesError> {
        let values = [
            self.source.capacity() as f64,
            self.source.queued_count() as f64,
            self.source.active_count() as f64,
        ];
        for (slot, value) in Slot::ALL.iter().zip(values) {
            self.series.set_value_at(value, slot.index())?;
        }
        self.caption = counts_caption(self.source.as_ref());
        Ok(values)
    }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.series)
    }
}

/// `T: <submitted> C: <completed>` with thousands separators.
pub fn counts_caption(source: &dyn PoolMetrics) -> String {
    format!(
        "T: {} C: {}",
        group_thousands(source.submitted_count()),
        group_thousands(source.completed_count())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FixedSource;

    fn options(scale: f64, alert: Option<f64>, warning: Option<f64>) -> MonitorOptions {
        MonitorOptions {
            scale,
            alert,
            warning,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_axis_and_alert_cut_point() {
        let source = Arc::new(FixedSource::new(15));
        let monitor = Monitor::new(MonitorId(1), "M1", source, &options(1.5, Some(0.9), None));

        let series = monitor.series();
        assert_eq!(series.axis_max(), 22.5);
        assert!(!series.is_adjustable());

        let threshold = series.threshold().unwrap();
        assert!((threshold.alert().unwrap() - 20.25).abs() < 1e-9);
        assert_eq!(threshold.warning(), None);
        assert_eq!(threshold.crisis(), None);
    }

    #[test]
    fn test_slots_are_seeded_in_order() {
        let source = Arc::new(FixedSource::new(5));
        source.set_queued(7);
        source.set_active(3);

        let monitor = Monitor::new(MonitorId(1), "M2", source, &MonitorOptions::default());
        assert_eq!(monitor.series().samples(), &[5.0, 7.0, 3.0]);
        assert_eq!(monitor.series().axis_max(), 5.0);
    }

    #[test]
    fn test_no_fractions_means_no_threshold_and_grid() {
        let source = Arc::new(FixedSource::new(5));
        let monitor = Monitor::new(MonitorId(1), "plain", source, &MonitorOptions::default());

        assert!(monitor.series().threshold().is_none());
        assert_eq!(monitor.series().grid_spacing(), Some(DEFAULT_GRID_SPACING));
    }

    #[test]
    fn test_warning_and_alert_fractions() {
        let source = Arc::new(FixedSource::new(10));
        let monitor = Monitor::new(
            MonitorId(1),
            "both",
            source,
            &options(2.0, Some(0.9), Some(0.8)),
        );

        let threshold = monitor.series().threshold().unwrap();
        assert!((threshold.alert().unwrap() - 18.0).abs() < 1e-9);
        assert!((threshold.warning().unwrap() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_refresh_updates_slots_and_caption() {
        let source = Arc::new(FixedSource::new(4));
        let mut monitor = Monitor::new(
            MonitorId(7),
            "pool",
            source.clone(),
            &MonitorOptions::default(),
        );

        source.set_queued(12);
        source.set_active(4);
        source.set_counts(1_500, 1_488);

        let values = monitor.refresh().unwrap();
        assert_eq!(values, [4.0, 12.0, 4.0]);
        assert_eq!(monitor.series().samples(), &[4.0, 12.0, 4.0]);
        assert_eq!(monitor.caption(), "T: 1,500 C: 1,488");
        // A fixed axis does not follow the queue.
        assert_eq!(monitor.series().axis_max(), 4.0);
    }

    #[test]
    fn test_termination_follows_source() {
        let source = Arc::new(FixedSource::new(1));
        let monitor = Monitor::new(MonitorId(1), "t", source.clone(), &MonitorOptions::default());
        assert!(!monitor.is_terminated());
        source.terminate();
        assert!(monitor.is_terminated());
    }

    #[test]
    fn test_caption_keeps_counts_past_i64() {
        let source = FixedSource::new(1);
        source.set_counts(u64::MAX, 9_223_372_036_854_775_808);
        assert_eq!(
            counts_caption(&source),
            "T: 18,446,744,073,709,551,615 C: 9,223,372,036,854,775,808"
        );
    }

    #[test]
    fn test_display() {
        let source = Arc::new(FixedSource::new(15));
        let monitor = Monitor::new(MonitorId(1), "M1", source, &MonitorOptions::default());
        assert_eq!(monitor.to_string(), "M1: M1 15.00, 0.00, 0.00");
        assert_eq!(MonitorId(3).to_string(), "#3");
    }
}
