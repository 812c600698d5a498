//! Daily time budget

use crate::error::{PlannerError, PlannerResult};
use crate::types::DayWindow;

/// Share of the nominal window usable for stays. The rest is kept for
/// travel between stops.
pub const RESERVE_FACTOR: f64 = 0.75;

/// Minutes of the window that may be filled with stays.
pub fn available_minutes(window: &DayWindow) -> u32 {
    (window.length_minutes() as f64 * RESERVE_FACTOR).floor() as u32
}

/// Parse an "HH:MM" clock time into minutes since midnight.
/// "24:00" is accepted as end of day.
pub fn parse_clock(value: &str) -> PlannerResult<u32> {
    let invalid = || PlannerError::InvalidClock(value.to_string());

    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    if minutes >= 60 || hours > 24 || (hours == 24 && minutes != 0) {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window(start: u32, end: u32) -> DayWindow {
        DayWindow::new(0, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(), start, end)
    }

    #[test]
    fn test_available_minutes_full_day() {
        // 10:00–22:00 = 720 nominal minutes
        assert_eq!(available_minutes(&window(600, 1320)), 540);
    }

    #[test]
    fn test_available_minutes_short_window() {
        // 10:00–12:00 = 120 nominal minutes
        assert_eq!(available_minutes(&window(600, 720)), 90);
    }

    #[test]
    fn test_available_minutes_floors() {
        assert_eq!(available_minutes(&window(600, 605)), 3);
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("10:00").unwrap(), 600);
        assert_eq!(parse_clock("09:30").unwrap(), 570);
        assert_eq!(parse_clock(" 7:05 ").unwrap(), 425);
        assert_eq!(parse_clock("24:00").unwrap(), 1440);
    }

    #[test]
    fn test_parse_clock_rejects_garbage() {
        assert_eq!(parse_clock("10").unwrap_err(), PlannerError::InvalidClock("10".to_string()));
        assert!(parse_clock("10:60").is_err());
        assert!(parse_clock("25:00").is_err());
        assert!(parse_clock("24:01").is_err());
        assert!(parse_clock("ab:cd").is_err());
    }
}
