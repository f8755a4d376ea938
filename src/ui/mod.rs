//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`render`]: orientation-specific layout of a series into draw primitives
//! - [`bars`]: paints primitives into a buffer; the per-series widget
//! - [`board`]: presentation-side indicator state, the event sink
//! - [`common`]: header, status bar and help overlay
//! - [`theme`]: light/dark theme support with terminal auto-detection
//!
//! ## Frame Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │                  ┌────────┬────────┐ │
//! │                  │  M1    │  M2    │ │  board, pinned top-right
//! │                  └────────┴────────┘ │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//! ```

pub mod bars;
pub mod board;
pub mod common;
pub mod render;
pub mod theme;

pub use bars::StatusBars;
pub use board::Board;
pub use render::{DrawOp, Renderer};
pub use theme::Theme;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;

/// Smallest terminal that fits the chrome and the placeholder.
pub const MIN_WIDTH: u16 = board::EMPTY_SIZE.width + 4;
pub const MIN_HEIGHT: u16 = board::EMPTY_SIZE.height + 2;

/// Draw one frame. Events must already be drained.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let y = area.y + area.height.saturating_sub(2) / 2;
        frame.render_widget(paragraph, Rect::new(area.x, y, area.width, 2.min(area.height)));
        return;
    }

    let [header, content, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    common::render_header(frame, app, header);
    frame.render_widget(&app.board, content);
    common::render_status_bar(frame, app, status);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::data::Orientation;
    use crate::monitor::presentation_channel;

    #[test]
    fn test_draw_empty_board() {
        let (_tx, rx) = presentation_channel();
        let app = App::new(rx, Orientation::Vertical, Duration::from_millis(100));
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let header: String = (0..40).map(|x| buffer[(x, 0)].symbol().to_string()).collect();
        assert!(header.contains("POOLWATCH"));
        assert!(header.contains("0 pools"));
        // Placeholder pinned to the right, just under the header.
        assert_eq!(buffer[(24, 1)].symbol(), "┌");
    }

    #[test]
    fn test_draw_too_small() {
        let (_tx, rx) = presentation_channel();
        let app = App::new(rx, Orientation::Vertical, Duration::from_millis(100));
        let mut terminal = Terminal::new(TestBackend::new(10, 5)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let header: String = (0..10).map(|x| buffer[(x, 0)].symbol().to_string()).collect();
        let warning: String = (0..10).map(|x| buffer[(x, 1)].symbol().to_string()).collect();
        assert!(header.trim().is_empty());
        assert!(!warning.trim().is_empty());
    }
}
