//! Day window types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Configured time window of one trip day.
///
/// `start` and `end` are minutes since midnight; a valid window has
/// `end > start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWindow {
    pub day_index: usize,
    pub date: NaiveDate,
    pub start: u32,
    pub end: u32,
}

impl DayWindow {
    pub fn new(day_index: usize, date: NaiveDate, start: u32, end: u32) -> Self {
        Self {
            day_index,
            date,
            start,
            end,
        }
    }

    /// Nominal window length in minutes
    pub fn length_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// True if the clock time `minute_of_day` falls inside the window.
    pub fn spans(&self, minute_of_day: u32) -> bool {
        self.start <= minute_of_day && minute_of_day < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: u32, end: u32) -> DayWindow {
        DayWindow::new(0, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(), start, end)
    }

    #[test]
    fn test_length_minutes() {
        assert_eq!(window(600, 1320).length_minutes(), 720);
    }

    #[test]
    fn test_spans_is_half_open() {
        let w = window(600, 720);
        assert!(w.spans(600));
        assert!(w.spans(719));
        assert!(!w.spans(720));
        assert!(!w.spans(599));
    }
}
