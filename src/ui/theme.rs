//! Theme configuration for the chrome around the board.
//!
//! Bar colors belong to each series. The theme only styles the header,
//! status bar and help overlay, with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Severity;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic selection based on terminal
/// background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and status messages.
    pub highlight: Color,
    /// Style for section headings.
    pub header: Style,
    /// Border style of overlays.
    pub border_type: BorderType,
}

impl Theme {
    /// Dark theme for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Light theme for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Header style for a severity, matching the bar palette.
    pub fn severity_style(&self, severity: Severity) -> Style {
        let style = Style::default().fg(severity.color());
        match severity {
            Severity::Alert | Severity::Crisis => style.add_modifier(Modifier::BOLD),
            Severity::NotSet => Style::default().add_modifier(Modifier::DIM),
            _ => style,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_style_uses_palette() {
        let theme = Theme::dark();
        assert_eq!(theme.severity_style(Severity::Good).fg, Some(Color::Green));
        assert_eq!(theme.severity_style(Severity::Warning).fg, Some(Color::Yellow));
        assert!(theme
            .severity_style(Severity::Alert)
            .add_modifier
            .contains(Modifier::BOLD));
        assert_eq!(theme.severity_style(Severity::NotSet).fg, None);
    }
}
