//! Orientation-specific layout of a [`StatusSeries`] into draw primitives.
//!
//! A [`Renderer`] is a pure function of a series and a target rectangle. It
//! emits [`DrawOp`]s in paint order; the [`painter`](super::bars) turns them
//! into terminal cells. Geometry is in terminal cells.
//!
//! ```text
//!  Vertical                         Horizontal
//!  ┌──────────────┐                 ┌──────────────┐
//!  │ ──────────── │ threshold       │██████│       │
//!  │ ██  ██       │                 │──────┼───────│ separator
//!  │ ██  ██  ██   │                 │███   │       │
//!  └──────────────┘                 └──────────────┘
//!       caption                          caption
//! ```

use ratatui::layout::{Direction, Margin, Position, Rect};
use ratatui::style::Color;

use crate::data::{Orientation, StatusSeries};

/// Gap between the target rectangle and the bar panel.
const INSET: u16 = 1;
/// Rows reserved for the caption under the panel.
const CAPTION_HEIGHT: u16 = 1;
/// Rows used by a vertical bar's value label.
const LABEL_HEIGHT: u16 = 1;
/// Cells left empty on each side of a vertical bar.
const VERTICAL_BAR_MARGIN: u16 = 1;
/// Upper bound on grid lines for one panel.
const MAX_GRID_LINES: usize = 512;

/// Panel border color.
pub const BORDER_COLOR: Color = Color::DarkGray;
/// Threshold and grid line color.
pub const LINE_COLOR: Color = Color::Black;
/// Line between adjacent horizontal bars.
pub const SEPARATOR_COLOR: Color = Color::Gray;
/// Caption text color (terminal default).
pub const CAPTION_COLOR: Color = Color::Reset;

/// One paint primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill a rectangle's background.
    Fill { area: Rect, color: Color },
    /// Outline a rectangle.
    Border { area: Rect, color: Color },
    /// An axis-aligned line of `length` cells starting at `start`.
    Line {
        start: Position,
        length: u16,
        direction: Direction,
        color: Color,
    },
    /// Text centered in `area`.
    Text {
        area: Rect,
        text: String,
        color: Color,
    },
}

/// Maps a series onto a rectangle. One variant per [`Orientation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    /// Bars grow upward from the bottom edge.
    Vertical,
    /// Bars grow rightward from the left edge.
    Horizontal,
}

impl From<Orientation> for Renderer {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Vertical => Renderer::Vertical,
            Orientation::Horizontal => Renderer::Horizontal,
        }
    }
}

impl Renderer {
    /// The renderer selected by a series' orientation.
    pub fn for_series(series: &StatusSeries) -> Self {
        series.orientation().into()
    }

    /// Lay out `series` inside `area`. An empty area produces no primitives.
    pub fn render(self, series: &StatusSeries, area: Rect) -> Vec<DrawOp> {
        let mut ops = Vec::new();
        if area.is_empty() {
            return ops;
        }

        let caption_height = CAPTION_HEIGHT.min(area.height);
        let caption = Rect::new(
            area.x,
            area.bottom() - caption_height,
            area.width,
            caption_height,
        );
        let graph = Rect::new(
            area.x.saturating_add(INSET),
            area.y.saturating_add(INSET),
            area.width.saturating_sub(2 * INSET),
            area.height.saturating_sub(caption_height + 2 * INSET),
        );

        if !graph.is_empty() {
            match self {
                Renderer::Vertical => vertical(series, graph, &mut ops),
                Renderer::Horizontal => horizontal(series, graph, &mut ops),
            }
        }

        ops.push(DrawOp::Text {
            area: caption,
            text: series.name().to_string(),
            color: CAPTION_COLOR,
        });
        ops
    }
}

/// Cells covered by `fraction` of `extent`, truncated.
fn scaled(fraction: f64, extent: u16) -> u16 {
    (f64::from(extent) * fraction) as u16
}

fn bar_count(series: &StatusSeries) -> u16 {
    u16::try_from(series.len()).unwrap_or(u16::MAX)
}

/// Per-bar share of the space inside the border. The remainder is unused.
fn slot_extent(extent: u16, count: u16) -> u16 {
    if count == 0 {
        0
    } else {
        extent.saturating_sub(2) / count
    }
}

/// Panel extent along the cross axis: whole slots plus the border.
fn panel_extent(slot: u16, count: u16) -> u16 {
    if count == 0 {
        0
    } else {
        slot * count + 2
    }
}

/// Values at which reference lines are drawn: threshold cut points when a
/// threshold is attached, otherwise grid multiples below the axis ceiling.
fn line_values(series: &StatusSeries) -> Vec<f64> {
    if let Some(threshold) = series.threshold() {
        return threshold.cut_points().collect();
    }
    let Some(spacing) = series.grid_spacing() else {
        return Vec::new();
    };
    let spacing = f64::from(spacing);
    (0..MAX_GRID_LINES)
        .map(|k| k as f64 * spacing)
        .take_while(|v| *v < series.axis_max())
        .collect()
}

/// Background panel and border. Returns the area inside the border.
fn panel(series: &StatusSeries, panel: Rect, ops: &mut Vec<DrawOp>) -> Rect {
    ops.push(DrawOp::Fill {
        area: panel,
        color: series.background,
    });
    ops.push(DrawOp::Border {
        area: panel,
        color: BORDER_COLOR,
    });
    panel.inner(Margin::new(1, 1))
}

fn vertical(series: &StatusSeries, graph: Rect, ops: &mut Vec<DrawOp>) {
    let count = bar_count(series);
    let slot = slot_extent(graph.width, count);
    let inner = panel(
        series,
        Rect {
            width: panel_extent(slot, count),
            ..graph
        },
        ops,
    );
    if inner.is_empty() {
        return;
    }

    let mut labels = Vec::with_capacity(series.len());
    for (i, &value) in series.samples().iter().enumerate() {
        let height = scaled(series.fraction(value), inner.height);
        let left = inner
            .x
            .saturating_add(slot.saturating_mul(i as u16))
            .saturating_add(VERTICAL_BAR_MARGIN);
        let width = slot.saturating_sub(2 * VERTICAL_BAR_MARGIN);
        let bar = Rect::new(left, inner.bottom() - height, width, height).intersection(inner);

        if !bar.is_empty() {
            ops.push(DrawOp::Fill {
                area: bar,
                color: series.bar_color_at(i).unwrap_or(series.bar_color),
            });
        }

        // Label sits on the bar's top row, or on the baseline for an empty bar.
        let label_row = if bar.is_empty() {
            inner.bottom() - 1
        } else {
            bar.y
        };
        let label = Rect::new(left, label_row, width, LABEL_HEIGHT).intersection(inner);
        if !label.is_empty() {
            labels.push(DrawOp::Text {
                area: label,
                text: format!("{}", value as i64),
                color: series.label_color_at(i).unwrap_or(series.label_color),
            });
        }
    }

    for value in line_values(series) {
        let offset = scaled(series.fraction(value), inner.height).max(1);
        ops.push(DrawOp::Line {
            start: Position::new(inner.x, inner.bottom() - offset),
            length: inner.width,
            direction: Direction::Horizontal,
            color: LINE_COLOR,
        });
    }

    // A line replaces whole cells, so labels go on top.
    ops.extend(labels);
}

fn horizontal(series: &StatusSeries, graph: Rect, ops: &mut Vec<DrawOp>) {
    let count = bar_count(series);
    let slot = slot_extent(graph.height, count);
    let inner = panel(
        series,
        Rect {
            height: panel_extent(slot, count),
            ..graph
        },
        ops,
    );
    if inner.is_empty() {
        return;
    }

    for (i, &value) in series.samples().iter().enumerate() {
        let top = inner.y.saturating_add(slot.saturating_mul(i as u16));
        let width = scaled(series.fraction(value), inner.width);
        let bar = Rect::new(inner.x, top, width, slot).intersection(inner);

        if !bar.is_empty() {
            ops.push(DrawOp::Fill {
                area: bar,
                color: series.bar_color_at(i).unwrap_or(series.bar_color),
            });
        }
        if i != 0 && top < inner.bottom() {
            ops.push(DrawOp::Line {
                start: Position::new(inner.x, top),
                length: inner.width,
                direction: Direction::Horizontal,
                color: SEPARATOR_COLOR,
            });
        }
    }

    for value in line_values(series) {
        let offset = scaled(series.fraction(value), inner.width).min(inner.width - 1);
        ops.push(DrawOp::Line {
            start: Position::new(inner.x + offset, inner.y),
            length: inner.height,
            direction: Direction::Vertical,
            color: LINE_COLOR,
        });
    }
}
