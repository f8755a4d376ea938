//! Severity classification against three ordered cut points.
//!
//! A [`ThresholdSet`] holds optional warning, alert and crisis values. An
//! unset cut point never triggers. Classification checks crisis first, then
//! alert, then warning, so the highest triggered band always wins.

use std::fmt;

use ratatui::style::Color;

/// Severity of a sample measured against a [`ThresholdSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// No threshold information. Only used to index the palettes.
    NotSet,
    Good,
    Warning,
    Alert,
    Crisis,
}

/// Bar fill colors indexed by [`Severity`].
pub const COLOR: [Color; 5] = [
    Color::White,
    Color::Green,
    Color::Yellow,
    Color::Red,
    Color::Gray,
];

/// Text colors that stay legible on top of the matching [`COLOR`] entry.
pub const COLOR_REVERSE: [Color; 5] = [
    Color::Black,
    Color::Black,
    Color::Black,
    Color::White,
    Color::White,
];

impl Severity {
    /// Fill color for this severity.
    pub fn color(self) -> Color {
        COLOR[self as usize]
    }

    /// Contrasting text color for this severity.
    pub fn reverse_color(self) -> Color {
        COLOR_REVERSE[self as usize]
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::NotSet => "-",
            Severity::Good => "OK",
            Severity::Warning => "WARN",
            Severity::Alert => "ALERT",
            Severity::Crisis => "CRIS",
        }
    }
}

/// Warning, alert and crisis cut points. `None` means the cut point is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThresholdSet {
    warning: Option<f64>,
    alert: Option<f64>,
    crisis: Option<f64>,
}

impl ThresholdSet {
    /// Create a set with every cut point ignored.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a set from explicit cut points.
    pub fn new(warning: Option<f64>, alert: Option<f64>, crisis: Option<f64>) -> Self {
        Self {
            warning,
            alert,
            crisis,
        }
    }

    pub fn warning(&self) -> Option<f64> {
        self.warning
    }

    pub fn alert(&self) -> Option<f64> {
        self.alert
    }

    pub fn crisis(&self) -> Option<f64> {
        self.crisis
    }

    pub fn set_warning(&mut self, value: Option<f64>) {
        self.warning = value;
    }

    pub fn set_alert(&mut self, value: Option<f64>) {
        self.alert = value;
    }

    pub fn set_crisis(&mut self, value: Option<f64>) {
        self.crisis = value;
    }

    /// Returns true when no cut point is set.
    pub fn is_empty(&self) -> bool {
        self.warning.is_none() && self.alert.is_none() && self.crisis.is_none()
    }

    /// Cut points in drawing order: crisis, alert, warning. Ignored ones are skipped.
    pub fn cut_points(&self) -> impl Iterator<Item = f64> {
        [self.crisis, self.alert, self.warning].into_iter().flatten()
    }

    /// Classify a value. Comparison is inclusive, so a value equal to a
    /// cut point already belongs to that band.
    pub fn classify(&self, value: f64) -> Severity {
        if triggered(self.crisis, value) {
            Severity::Crisis
        } else if triggered(self.alert, value) {
            Severity::Alert
        } else if triggered(self.warning, value) {
            Severity::Warning
        } else {
            Severity::Good
        }
    }

    /// Bar fill color for a value.
    pub fn color_for(&self, value: f64) -> Color {
        self.classify(value).color()
    }

    /// Label color for a value drawn on top of its bar.
    pub fn reverse_color_for(&self, value: f64) -> Color {
        self.classify(value).reverse_color()
    }
}

fn triggered(cut: Option<f64>, value: f64) -> bool {
    cut.is_some_and(|cut| value >= cut)
}

impl fmt::Display for ThresholdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |cut: Option<f64>| cut.map_or_else(|| "-".to_string(), |v| format!("{v}"));
        write!(
            f,
            "W:{} A:{} C:{}",
            show(self.warning),
            show(self.alert),
            show(self.crisis)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_only_wins_above_its_cut() {
        let threshold = ThresholdSet::new(None, Some(50.0), None);

        assert_eq!(threshold.classify(49.0), Severity::Good);
        assert_eq!(threshold.classify(50.0), Severity::Alert);
        assert_eq!(threshold.classify(1000.0), Severity::Alert);
    }

    #[test]
    fn test_precedence_crisis_over_alert_over_warning() {
        let threshold = ThresholdSet::new(Some(10.0), Some(20.0), Some(30.0));

        assert_eq!(threshold.classify(9.99), Severity::Good);
        assert_eq!(threshold.classify(10.0), Severity::Warning);
        assert_eq!(threshold.classify(25.0), Severity::Alert);
        assert_eq!(threshold.classify(30.0), Severity::Crisis);
        assert_eq!(threshold.classify(f64::MAX), Severity::Crisis);
    }

    #[test]
    fn test_empty_set_never_triggers() {
        let threshold = ThresholdSet::empty();

        for value in [f64::MIN, -1.0, 0.0, 1.0, 1e12, f64::MAX] {
            assert_eq!(threshold.classify(value), Severity::Good);
        }
        assert!(threshold.is_empty());
    }

    #[test]
    fn test_values_below_warning_are_good() {
        let threshold = ThresholdSet::new(Some(80.0), Some(90.0), None);

        for value in [-5.0, 0.0, 42.0, 79.999] {
            assert_eq!(threshold.classify(value), Severity::Good);
        }
    }

    #[test]
    fn test_accessors_return_constructed_values() {
        let threshold = ThresholdSet::new(Some(1.5), Some(2.5), Some(3.5));

        assert_eq!(threshold.warning(), Some(1.5));
        assert_eq!(threshold.alert(), Some(2.5));
        assert_eq!(threshold.crisis(), Some(3.5));
    }

    #[test]
    fn test_setters_and_cut_point_order() {
        let mut threshold = ThresholdSet::empty();
        threshold.set_warning(Some(8.0));
        threshold.set_crisis(Some(12.0));

        let cuts: Vec<f64> = threshold.cut_points().collect();
        assert_eq!(cuts, vec![12.0, 8.0]);

        threshold.set_crisis(None);
        assert_eq!(threshold.classify(100.0), Severity::Warning);
    }

    #[test]
    fn test_palettes_contrast() {
        let threshold = ThresholdSet::new(Some(10.0), Some(20.0), None);

        assert_eq!(threshold.color_for(5.0), Color::Green);
        assert_eq!(threshold.reverse_color_for(5.0), Color::Black);
        assert_eq!(threshold.color_for(15.0), Color::Yellow);
        assert_eq!(threshold.color_for(25.0), Color::Red);
        assert_eq!(threshold.reverse_color_for(25.0), Color::White);
        assert_eq!(Severity::NotSet.color(), Color::White);
    }

    #[test]
    fn test_display_marks_ignored_cut_points() {
        let threshold = ThresholdSet::new(None, Some(20.25), None);
        assert_eq!(threshold.to_string(), "W:- A:20.25 C:-");
    }
}
