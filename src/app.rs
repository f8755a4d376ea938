//! Application state for the interactive board.

use std::time::{Duration, Instant};

use crate::data::Orientation;
use crate::monitor::EventReceiver;
use crate::ui::board::Board;
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// State owned by the draw thread.
pub struct App {
    /// Whether the main loop should keep running.
    pub running: bool,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Indicator state, only mutated through [`App::drain_events`].
    pub board: Board,
    /// Color theme for the chrome. Dark until the binary detects otherwise.
    pub theme: Theme,
    /// Interval of the reconciliation loop, shown in the status bar.
    pub interval: Duration,
    events: EventReceiver,
    last_event: Option<Instant>,
    status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(events: EventReceiver, orientation: Orientation, interval: Duration) -> Self {
        Self {
            running: true,
            show_help: false,
            board: Board::new(orientation),
            theme: Theme::default(),
            interval,
            events,
            last_event: None,
            status_message: None,
        }
    }

    /// Apply staged presentation events. Called once per frame, before drawing.
    pub fn drain_events(&mut self) -> usize {
        let applied = self.events.drain(&mut self.board);
        if applied > 0 {
            self.last_event = Some(Instant::now());
        }
        applied
    }

    /// Time since the last applied event, if any arrived yet.
    pub fn since_last_event(&self) -> Option<Duration> {
        self.last_event.map(|t| t.elapsed())
    }

    /// Flip every indicator between vertical and horizontal bars.
    pub fn swap_orientation(&mut self) {
        let orientation = self.board.swap_orientation();
        self.set_status_message(format!("Bars are now {orientation}"));
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
