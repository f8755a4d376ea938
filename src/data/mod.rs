//! Data models for bar indicators.
//!
//! ## Submodules
//!
//! - [`threshold`]: [`ThresholdSet`] and [`Severity`] classification
//! - [`series`]: [`StatusSeries`], the samples behind one indicator
//! - [`format`]: thousands-separated number formatting
//!
//! ## Data Flow
//!
//! ```text
//! pool metrics ──▶ StatusSeries::set_value_at() ──▶ auto_scale()
//!                          │
//!                          └──▶ ThresholdSet::classify() (per sample, at draw time)
//! ```

pub mod format;
pub mod series;
pub mod threshold;

pub use series::{Orientation, SeriesError, StatusSeries};
pub use threshold::{Severity, ThresholdSet};
