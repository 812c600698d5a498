//! Conversion of wizard payloads into validated planner input

use std::collections::HashSet;

use tracing::debug;

use super::budget::parse_clock;
use crate::defaults::{DEFAULT_DAY_END_MINUTES, DEFAULT_DAY_START_MINUTES, DEFAULT_STAY_MINUTES};
use crate::error::{PlannerError, PlannerResult};
use crate::types::{
    Coordinates, DayWindow, DayWindowInput, Lodging, LodgingSelection, Place, PlaceSelection,
    TripInput, TripRequest,
};

/// Build planner input from a trip request. Day windows are sorted by day
/// index; every contract breach is reported as an error.
pub fn build_trip_input(request: &TripRequest) -> PlannerResult<TripInput> {
    let mut windows = request
        .days
        .iter()
        .map(day_window)
        .collect::<PlannerResult<Vec<_>>>()?;
    windows.sort_by_key(|w| w.day_index);

    let input = TripInput {
        places: request.places.iter().map(place).collect(),
        lodgings: request.lodgings.iter().map(lodging).collect(),
        windows,
        mode: request.mode,
    };

    validate_input(&input)?;

    debug!(
        "Trip input: {} places, {} lodgings, {} days",
        input.places.len(),
        input.lodgings.len(),
        input.total_days()
    );

    Ok(input)
}

/// Check the invariants distribution relies on.
///
/// Windows must carry distinct day indices in `0..total_days` with
/// `end > start`; lodgings must reference existing days, at most one per day;
/// place ids must be unique.
pub fn validate_input(input: &TripInput) -> PlannerResult<()> {
    let total_days = input.total_days();

    let mut seen_days = HashSet::new();
    for w in &input.windows {
        if w.day_index >= total_days {
            return Err(PlannerError::DayOutOfRange {
                day_index: w.day_index,
                total_days,
            });
        }
        if !seen_days.insert(w.day_index) {
            return Err(PlannerError::DuplicateDayWindow(w.day_index));
        }
        if w.end <= w.start {
            return Err(PlannerError::EmptyDayWindow {
                day_index: w.day_index,
                start: w.start,
                end: w.end,
            });
        }
    }

    let mut lodging_days = HashSet::new();
    for l in &input.lodgings {
        if l.day_index >= total_days {
            return Err(PlannerError::DayOutOfRange {
                day_index: l.day_index,
                total_days,
            });
        }
        if !lodging_days.insert(l.day_index) {
            return Err(PlannerError::DuplicateLodging(l.day_index));
        }
    }

    let mut place_ids = HashSet::new();
    for p in &input.places {
        if !place_ids.insert(p.id.as_str()) {
            return Err(PlannerError::DuplicatePlace(p.id.clone()));
        }
    }

    Ok(())
}

fn day_window(input: &DayWindowInput) -> PlannerResult<DayWindow> {
    let start = match input.start_time.as_deref() {
        Some(s) => parse_clock(s)?,
        None => DEFAULT_DAY_START_MINUTES,
    };
    let end = match input.end_time.as_deref() {
        Some(s) => parse_clock(s)?,
        None => DEFAULT_DAY_END_MINUTES,
    };

    Ok(DayWindow::new(input.day_index, input.date, start, end))
}

fn place(selection: &PlaceSelection) -> Place {
    let stay_minutes = match (selection.stay_hours, selection.stay_minutes) {
        (None, None) => DEFAULT_STAY_MINUTES,
        (hours, minutes) => hours
            .unwrap_or(0)
            .saturating_mul(60)
            .saturating_add(minutes.unwrap_or(0)),
    };

    Place::new(
        selection.id.clone(),
        selection.name.clone(),
        selection.category,
        Coordinates::from_parts(selection.lat, selection.lng),
        stay_minutes,
    )
}

fn lodging(selection: &LodgingSelection) -> Lodging {
    Lodging {
        day_index: selection.day_index,
        name: selection.name.clone(),
        coordinates: Coordinates::from_parts(selection.lat, selection.lng),
    }
}
