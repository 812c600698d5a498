//! Planner error types
//!
//! Only caller contract breaches are errors. Malformed coordinates, routing
//! failures and places that fit nowhere are handled inside the engine and
//! reported as data.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("day index {day_index} outside trip of {total_days} days")]
    DayOutOfRange { day_index: usize, total_days: usize },

    #[error("day {0} has more than one time window")]
    DuplicateDayWindow(usize),

    #[error("day {day_index} window must end after it starts ({start}..{end})")]
    EmptyDayWindow { day_index: usize, start: u32, end: u32 },

    #[error("invalid clock time '{0}', expected HH:MM")]
    InvalidClock(String),

    #[error("day {0} has more than one lodging")]
    DuplicateLodging(usize),

    #[error("place id '{0}' selected more than once")]
    DuplicatePlace(String),

    #[error("position {position} outside day {day_index} with {len} visits")]
    PositionOutOfRange {
        day_index: usize,
        position: usize,
        len: usize,
    },
}

pub type PlannerResult<T> = Result<T, PlannerError>;
