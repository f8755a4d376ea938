//! Paints [`DrawOp`]s into a ratatui buffer.

use ratatui::buffer::Buffer;
use ratatui::layout::{Direction, Position, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Widget};

use crate::data::StatusSeries;
use crate::ui::render::{DrawOp, Renderer};

/// Bar indicator widget for one series.
#[derive(Debug, Clone, Copy)]
pub struct StatusBars<'a> {
    series: &'a StatusSeries,
}

impl<'a> StatusBars<'a> {
    pub fn new(series: &'a StatusSeries) -> Self {
        Self { series }
    }
}

impl Widget for StatusBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let ops = Renderer::for_series(self.series).render(self.series, area);
        paint(&ops, buf);
    }
}

/// Apply primitives in order. Anything outside the buffer is dropped.
pub fn paint(ops: &[DrawOp], buf: &mut Buffer) {
    for op in ops {
        match op {
            DrawOp::Fill { area, color } => {
                let area = area.intersection(buf.area);
                if !area.is_empty() {
                    buf.set_style(area, Style::default().bg(*color));
                }
            }
            DrawOp::Border { area, color } => {
                let area = area.intersection(buf.area);
                if !area.is_empty() {
                    Block::bordered()
                        .border_style(Style::default().fg(*color))
                        .render(area, buf);
                }
            }
            DrawOp::Line {
                start,
                length,
                direction,
                color,
            } => {
                let symbol = match direction {
                    Direction::Horizontal => "─",
                    Direction::Vertical => "│",
                };
                for step in 0..*length {
                    let position = match direction {
                        Direction::Horizontal => Position::new(start.x.saturating_add(step), start.y),
                        Direction::Vertical => Position::new(start.x, start.y.saturating_add(step)),
                    };
                    if let Some(cell) = buf.cell_mut(position) {
                        cell.set_symbol(symbol).set_fg(*color);
                    }
                }
            }
            DrawOp::Text { area, text, color } => {
                let area = area.intersection(buf.area);
                if area.is_empty() {
                    continue;
                }
                let width = u16::try_from(Line::raw(text.as_str()).width()).unwrap_or(u16::MAX);
                let x = area.x + area.width.saturating_sub(width) / 2;
                buf.set_stringn(
                    x,
                    area.y,
                    text,
                    usize::from(area.right() - x),
                    Style::default().fg(*color),
                );
            }
        }
    }
}
