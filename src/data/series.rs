//! Ordered numeric samples sharing one axis.
//!
//! A [`StatusSeries`] is the model behind one bar indicator: a display name,
//! an orientation, an axis ceiling, an optional [`ThresholdSet`] and a list of
//! samples drawn in insertion order.

use std::fmt;

use ratatui::style::Color;
use thiserror::Error;

use super::format::format_decimal;
use super::threshold::ThresholdSet;

/// Granularity used when the axis grows to fit a new sample.
const SCALE_STEP: f64 = 100.0;

/// Errors raised when mutating a series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// The slot was never created with [`StatusSeries::add_value`].
    #[error("sample index {index} out of range (series has {len} samples)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Direction bars grow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Bars grow upward from the bottom edge.
    #[default]
    Vertical,
    /// Bars grow rightward from the left edge.
    Horizontal,
}

impl Orientation {
    /// The other orientation.
    pub fn swapped(self) -> Self {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }

    /// Lowercase name, as accepted in settings.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named list of samples drawn as adjacent bars on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSeries {
    name: String,
    orientation: Orientation,
    axis_max: f64,
    adjustable: bool,
    grid_spacing: Option<u32>,
    threshold: Option<ThresholdSet>,
    samples: Vec<f64>,
    /// Panel background behind the bars.
    pub background: Color,
    /// Bar fill used when no threshold is attached.
    pub bar_color: Color,
    /// Label color used when no threshold is attached.
    pub label_color: Color,
}

impl StatusSeries {
    /// Create an empty, adjustable series with an unset axis.
    pub fn new(orientation: Orientation, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            orientation,
            axis_max: 0.0,
            adjustable: true,
            grid_spacing: None,
            threshold: None,
            samples: Vec::new(),
            background: Color::White,
            bar_color: Color::DarkGray,
            label_color: Color::White,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Change orientation. The renderer follows on the next draw.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn axis_max(&self) -> f64 {
        self.axis_max
    }

    /// Set the axis ceiling directly, then run the auto-scale check with the
    /// same value as if it had just been observed.
    pub fn set_axis_max(&mut self, value: f64) {
        self.axis_max = value;
        self.auto_scale(value);
    }

    pub fn is_adjustable(&self) -> bool {
        self.adjustable
    }

    /// When false, the axis never grows to fit new samples.
    pub fn set_adjustable(&mut self, adjustable: bool) {
        self.adjustable = adjustable;
    }

    pub fn grid_spacing(&self) -> Option<u32> {
        self.grid_spacing
    }

    /// Draw grid lines every `spacing` units when no threshold is attached.
    /// Zero clears the grid.
    pub fn set_grid_spacing(&mut self, spacing: Option<u32>) {
        self.grid_spacing = spacing.filter(|s| *s > 0);
    }

    pub fn threshold(&self) -> Option<&ThresholdSet> {
        self.threshold.as_ref()
    }

    pub fn threshold_mut(&mut self) -> Option<&mut ThresholdSet> {
        self.threshold.as_mut()
    }

    pub fn set_threshold(&mut self, threshold: Option<ThresholdSet>) {
        self.threshold = threshold;
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Result<f64, SeriesError> {
        self.samples
            .get(index)
            .copied()
            .ok_or(SeriesError::IndexOutOfRange {
                index,
                len: self.samples.len(),
            })
    }

    /// Grow the axis to the next multiple of 100 when `observed` exceeds it.
    /// Exact multiples are kept as they are. The axis never shrinks.
    pub fn auto_scale(&mut self, observed: f64) {
        if self.adjustable && observed > self.axis_max {
            self.axis_max = (observed / SCALE_STEP).ceil() * SCALE_STEP;
        }
    }

    /// Append a sample. Positive samples may grow the axis.
    pub fn add_value(&mut self, value: f64) {
        self.samples.push(value);
        if value > 0.0 {
            self.auto_scale(value);
        }
    }

    /// Overwrite an existing sample. The series is untouched on error.
    pub fn set_value_at(&mut self, value: f64, index: usize) -> Result<(), SeriesError> {
        let len = self.samples.len();
        let slot = self
            .samples
            .get_mut(index)
            .ok_or(SeriesError::IndexOutOfRange { index, len })?;
        *slot = value;
        if value > 0.0 {
            self.auto_scale(value);
        }
        Ok(())
    }

    /// Fraction of the value axis a value fills, clamped to `[0, 1]`.
    /// A degenerate axis fills nothing.
    pub fn fraction(&self, value: f64) -> f64 {
        if self.axis_max <= 0.0 || !self.axis_max.is_finite() || value.is_nan() {
            return 0.0;
        }
        (value.min(self.axis_max) / self.axis_max).clamp(0.0, 1.0)
    }

    /// Fill fraction of the bar at `index`.
    pub fn bar_fraction(&self, index: usize) -> Result<f64, SeriesError> {
        self.value_at(index).map(|v| self.fraction(v))
    }

    /// Fill color of the bar at `index`: threshold color when attached,
    /// otherwise the flat bar color.
    pub fn bar_color_at(&self, index: usize) -> Result<Color, SeriesError> {
        let value = self.value_at(index)?;
        Ok(self
            .threshold
            .as_ref()
            .map_or(self.bar_color, |t| t.color_for(value)))
    }

    /// Label color of the bar at `index`, chosen to contrast with its fill.
    pub fn label_color_at(&self, index: usize) -> Result<Color, SeriesError> {
        let value = self.value_at(index)?;
        Ok(self
            .threshold
            .as_ref()
            .map_or(self.label_color, |t| t.reverse_color_for(value)))
    }
}

impl fmt::Display for StatusSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.samples.iter().map(|v| format_decimal(*v)).collect();
        write!(f, "{} {}", self.name, values.join(", "))
    }
}
