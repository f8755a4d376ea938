//! Chrome shared by every frame: header, status bar and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the header bar: worst severity, pool count and bar direction.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let severity = app.board.severity();

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.severity_style(severity)),
        Span::styled("POOLWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("{}", app.board.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" pools │ "),
        Span::styled(severity.symbol(), app.theme.severity_style(severity)),
        Span::raw(format!(" │ {}", app.board.orientation())),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// A temporary status message takes precedence over the refresh summary.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {msg} ")).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "o:orientation ?:help q:quit";
    let status = match app.since_last_event() {
        Some(elapsed) => format!(
            " Every {}ms | Updated {:.1}s ago | {}",
            app.interval.as_millis(),
            elapsed.as_secs_f64(),
            controls,
        ),
        None => format!(" Waiting for pools... | {controls}"),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts, centered on `area`.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  o         Swap bar orientation"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q/Esc     Quit"),
        Line::from("  Ctrl-C    Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Bars",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  threads | queued | active"),
        Line::from("  T: submitted  C: completed"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 34u16.min(area.width.saturating_sub(4));
    let help_height = 14u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
