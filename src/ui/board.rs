//! Presentation-side state for every attached indicator.
//!
//! The board is the only [`PresentationSink`]. It is mutated exclusively by
//! draining the event channel on the draw thread, so no locking is needed.

use std::fmt;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Widget};
use tracing::{debug, trace, warn};

use crate::data::{Orientation, Severity, StatusSeries};
use crate::monitor::{MonitorId, PresentationSink, Slot};
use crate::ui::bars::StatusBars;

/// Cells taken by one indicator, counts line included.
pub const INDICATOR_SIZE: Size = Size::new(18, 14);
/// Size of the board when nothing is attached.
pub const EMPTY_SIZE: Size = Size::new(16, 12);

const EMPTY_TEXT: &str = "no pools";

/// One attached monitor as the draw thread sees it.
#[derive(Debug, Clone)]
pub struct Indicator {
    pub id: MonitorId,
    pub label: String,
    pub series: StatusSeries,
    /// Submitted/completed counts line, empty until the first tick.
    pub caption: String,
}

impl Indicator {
    /// Worst severity across the bars, or `NotSet` without a threshold.
    pub fn severity(&self) -> Severity {
        let Some(threshold) = self.series.threshold() else {
            return Severity::NotSet;
        };
        self.series
            .samples()
            .iter()
            .map(|v| threshold.classify(*v))
            .max()
            .unwrap_or(Severity::Good)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.series)
    }
}

/// Ordered indicators plus the packed frame size.
#[derive(Debug)]
pub struct Board {
    indicators: Vec<Indicator>,
    orientation: Orientation,
    frame: Size,
    collapsed: bool,
}

impl Board {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            indicators: Vec::new(),
            orientation,
            frame: EMPTY_SIZE,
            collapsed: true,
        }
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn get(&self, id: MonitorId) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Worst severity across every indicator.
    pub fn severity(&self) -> Severity {
        self.indicators
            .iter()
            .map(Indicator::severity)
            .max()
            .unwrap_or(Severity::NotSet)
    }

    /// True while showing the empty placeholder.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Size of the packed board.
    pub fn frame_size(&self) -> Size {
        self.frame
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Flip every indicator between vertical and horizontal bars.
    pub fn swap_orientation(&mut self) -> Orientation {
        self.orientation = self.orientation.swapped();
        for indicator in &mut self.indicators {
            indicator.series.set_orientation(self.orientation);
        }
        self.orientation
    }

    /// Board rectangle inside `area`, pinned to the top-right corner.
    pub fn frame_area(&self, area: Rect) -> Rect {
        let width = self.frame.width.min(area.width);
        let height = self.frame.height.min(area.height);
        Rect::new(area.right() - width, area.y, width, height)
    }

    /// One rectangle per indicator, left to right, in attach order.
    pub fn layout(&self, area: Rect) -> Vec<Rect> {
        if self.collapsed || self.indicators.is_empty() {
            return Vec::new();
        }
        let frame = self.frame_area(area);
        let count = self.indicators.len() as u32;
        Layout::horizontal((0..count).map(|_| Constraint::Ratio(1, count)))
            .split(frame)
            .to_vec()
    }

    fn find_mut(&mut self, id: MonitorId) -> Option<&mut Indicator> {
        self.indicators.iter_mut().find(|i| i.id == id)
    }

    fn pack(&mut self) {
        let count = u16::try_from(self.indicators.len()).unwrap_or(u16::MAX);
        self.frame = Size::new(
            INDICATOR_SIZE.width.saturating_mul(count),
            INDICATOR_SIZE.height,
        );
        self.collapsed = false;
    }
}

impl PresentationSink for Board {
    fn attach(&mut self, id: MonitorId, label: String, mut series: StatusSeries) {
        series.set_orientation(self.orientation);
        debug!(%id, %label, "indicator attached");
        self.indicators.push(Indicator {
            id,
            label,
            series,
            caption: String::new(),
        });
    }

    fn detach(&mut self, id: MonitorId) {
        let before = self.indicators.len();
        self.indicators.retain(|i| i.id != id);
        if self.indicators.len() == before {
            trace!(%id, "detach for unknown indicator");
        } else {
            debug!(%id, "indicator detached");
        }
    }

    fn update(&mut self, id: MonitorId, slot: Slot, value: f64) {
        let Some(indicator) = self.find_mut(id) else {
            trace!(%id, "update for unknown indicator");
            return;
        };
        if let Err(e) = indicator.series.set_value_at(value, slot.index()) {
            warn!(%id, ?slot, error = %e, "dropping sample");
        }
    }

    fn caption(&mut self, id: MonitorId, text: String) {
        if let Some(indicator) = self.find_mut(id) {
            indicator.caption = text;
        }
    }

    fn request_relayout(&mut self) {
        if self.indicators.is_empty() {
            self.request_collapse_to_empty();
        } else {
            self.pack();
        }
    }

    fn request_collapse_to_empty(&mut self) {
        self.frame = EMPTY_SIZE;
        self.collapsed = true;
    }
}

impl Widget for &Board {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.collapsed || self.indicators.is_empty() {
            let frame = self.frame_area(area);
            Paragraph::new(EMPTY_TEXT)
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(Block::bordered())
                .render(frame, buf);
            return;
        }

        for (indicator, slot) in self.indicators.iter().zip(self.layout(area)) {
            let [bars, counts] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(slot);
            StatusBars::new(&indicator.series).render(bars, buf);
            Paragraph::new(indicator.caption.as_str())
                .alignment(Alignment::Center)
                .render(counts, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::PresentationEvent;

    fn series(name: &str) -> StatusSeries {
        let mut series = StatusSeries::new(Orientation::Vertical, name);
        for _ in Slot::ALL {
            series.add_value(0.0);
        }
        series
    }

    fn attach(board: &mut Board, id: u64, label: &str) {
        board.attach(MonitorId(id), label.to_string(), series(label));
        board.request_relayout();
    }

    #[test]
    fn test_starts_collapsed() {
        let board = Board::new(Orientation::Vertical);
        assert!(board.is_collapsed());
        assert_eq!(board.frame_size(), EMPTY_SIZE);
        assert!(board.layout(Rect::new(0, 0, 80, 24)).is_empty());
    }

    #[test]
    fn test_relayout_packs_indicators() {
        let mut board = Board::new(Orientation::Vertical);
        attach(&mut board, 1, "M1");
        attach(&mut board, 2, "M2");
        assert!(!board.is_collapsed());
        assert_eq!(board.frame_size(), Size::new(36, 14));

        let slots = board.layout(Rect::new(0, 0, 80, 24));
        assert_eq!(slots, vec![Rect::new(44, 0, 18, 14), Rect::new(62, 0, 18, 14)]);
    }

    #[test]
    fn test_frame_is_clipped_to_area() {
        let mut board = Board::new(Orientation::Vertical);
        for id in 0..6 {
            attach(&mut board, id, "pool");
        }
        let frame = board.frame_area(Rect::new(0, 1, 60, 10));
        assert_eq!(frame, Rect::new(0, 1, 60, 10));
    }

    #[test]
    fn test_update_and_caption_reach_indicator() {
        let mut board = Board::new(Orientation::Vertical);
        attach(&mut board, 7, "M1");

        PresentationEvent::Update {
            id: MonitorId(7),
            slot: Slot::Active,
            value: 4.0,
        }
        .apply(&mut board);
        board.caption(MonitorId(7), "T: 1,200 C: 1,000".into());

        let indicator = board.get(MonitorId(7)).unwrap();
        assert_eq!(indicator.series.samples(), &[0.0, 0.0, 4.0]);
        assert_eq!(indicator.caption, "T: 1,200 C: 1,000");
    }

    #[test]
    fn test_events_for_unknown_ids_are_ignored() {
        let mut board = Board::new(Orientation::Vertical);
        attach(&mut board, 1, "M1");
        board.update(MonitorId(99), Slot::Queued, 3.0);
        board.caption(MonitorId(99), "x".into());
        board.detach(MonitorId(99));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_detach_then_collapse() {
        let mut board = Board::new(Orientation::Vertical);
        attach(&mut board, 1, "M1");
        attach(&mut board, 2, "M2");

        board.detach(MonitorId(1));
        board.request_relayout();
        assert_eq!(board.frame_size(), INDICATOR_SIZE);
        assert_eq!(board.indicators()[0].label, "M2");

        board.detach(MonitorId(2));
        board.request_collapse_to_empty();
        assert!(board.is_collapsed());
        assert_eq!(board.frame_size(), EMPTY_SIZE);
    }

    #[test]
    fn test_swap_orientation_applies_to_new_and_existing() {
        let mut board = Board::new(Orientation::Vertical);
        attach(&mut board, 1, "M1");
        assert_eq!(board.swap_orientation(), Orientation::Horizontal);
        attach(&mut board, 2, "M2");

        for indicator in board.indicators() {
            assert_eq!(indicator.series.orientation(), Orientation::Horizontal);
        }
    }

    #[test]
    fn test_renders_placeholder_when_empty() {
        let board = Board::new(Orientation::Vertical);
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        (&board).render(area, &mut buf);

        // 16 wide at the right edge: x 24..40, text on the first inner row.
        assert_eq!(buf[(24, 0)].symbol(), "┌");
        let row: String = (25..39).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(row.trim(), "no pools");
    }

    #[test]
    fn test_renders_counts_line() {
        let mut board = Board::new(Orientation::Vertical);
        attach(&mut board, 1, "M1");
        board.caption(MonitorId(1), "T: 5 C: 2".into());

        let area = Rect::new(0, 0, 18, 14);
        let mut buf = Buffer::empty(area);
        (&board).render(area, &mut buf);

        let row: String = (0..18).map(|x| buf[(x, 13)].symbol().to_string()).collect();
        assert_eq!(row.trim(), "T: 5 C: 2");
        let caption: String = (0..18).map(|x| buf[(x, 12)].symbol().to_string()).collect();
        assert_eq!(caption.trim(), "M1");
    }

    #[test]
    fn test_severity_is_worst_bar() {
        use crate::data::ThresholdSet;

        let mut board = Board::new(Orientation::Vertical);
        attach(&mut board, 1, "M1");
        assert_eq!(board.severity(), Severity::NotSet);

        let mut thresholded = series("M2");
        thresholded.set_threshold(Some(ThresholdSet::new(Some(8.0), Some(9.0), None)));
        board.attach(MonitorId(2), "M2".into(), thresholded);
        board.update(MonitorId(2), Slot::Queued, 8.5);
        assert_eq!(board.get(MonitorId(2)).unwrap().severity(), Severity::Warning);
        assert_eq!(board.severity(), Severity::Warning);
    }

    #[test]
    fn test_indicator_display() {
        let mut board = Board::new(Orientation::Vertical);
        attach(&mut board, 1, "M1");
        board.update(MonitorId(1), Slot::Capacity, 1500.0);
        assert_eq!(board.indicators()[0].to_string(), "M1: M1 1,500.00, 0.00, 0.00");
    }
}
