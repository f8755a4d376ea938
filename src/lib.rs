//! # poolwatch
//!
//! Live bar indicators for worker pools, drawn in the terminal.
//!
//! Each watched pool gets one indicator with three bars: worker capacity,
//! queued jobs and active jobs, plus a `T: <submitted> C: <completed>` line.
//! Optional warning and alert cut points recolor bars that run hot. Pools
//! that shut down and drain are removed automatically.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  pool / source          monitor                  ui          │
//! │ ┌────────────┐ reads ┌────────────────┐ events ┌──────────┐  │
//! │ │ WorkerPool │◀──────│ MonitorRegistry│───────▶│  Board   │  │
//! │ │ PoolMetrics│       │ ReconcileLoop  │ (mpsc) │ Renderer │  │
//! │ └────────────┘       └────────────────┘        └────┬─────┘  │
//! │                              data                   ▼        │
//! │                 StatusSeries, ThresholdSet      Terminal     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: [`ThresholdSet`] severity classification and
//!   [`StatusSeries`], the sample list behind one indicator
//! - **[`source`]**: the [`PoolMetrics`] contract a watched pool implements
//! - **[`pool`]**: [`WorkerPool`], a bounded thread pool with [`PoolNaming`]
//! - **[`monitor`]**: [`MonitorRegistry`], the [`ReconcileLoop`] that keeps
//!   it current, and the [`PresentationEvent`]s it emits
//! - **[`ui`]**: [`Renderer`](ui::Renderer) layouts for both orientations,
//!   the [`Board`](ui::Board) sink, theme and chrome
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Two demo pools, alert at 90% and warning at 80% of 1.5x capacity
//! poolwatch --scale 1.5 --alert 0.9 --warning 0.8
//!
//! # Horizontal bars, demo pools shut down after 20 seconds
//! poolwatch --horizontal --demo-seconds 20
//!
//! # No terminal UI, log every tick to stderr
//! poolwatch --headless
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::time::Duration;
//! use poolwatch::{presentation_channel, MonitorOptions, MonitorRegistry, ReconcileLoop};
//!
//! # tokio_test::block_on(async {
//! let (events, mut receiver) = presentation_channel();
//! let registry = MonitorRegistry::new(MonitorOptions::default(), events);
//!
//! let pool = registry.named_pool("io", 4).unwrap();
//! let handle = ReconcileLoop::spawn(registry.clone(), Duration::from_millis(100));
//!
//! pool.submit(|| {}).unwrap();
//! // Hand `receiver` to the draw thread; it drains once per frame.
//! # assert!(!receiver.collect_pending().is_empty());
//!
//! handle.stop();
//! # });
//! ```

pub mod app;
pub mod data;
pub mod demo;
pub mod events;
pub mod monitor;
pub mod pool;
pub mod settings;
pub mod source;
pub mod telemetry;
pub mod ui;

pub use data::{Orientation, SeriesError, Severity, StatusSeries, ThresholdSet};
pub use monitor::{
    presentation_channel, EventReceiver, EventSender, LoopHandle, Monitor, MonitorError, MonitorId,
    MonitorOptions, MonitorRegistry, PresentationEvent, PresentationSink, ReconcileLoop, Slot,
    TickReport,
};
pub use pool::{PoolError, PoolNaming, WorkerPool};
pub use settings::Settings;
pub use source::{FixedSource, PoolMetrics};
