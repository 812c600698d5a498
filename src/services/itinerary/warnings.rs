//! Advisory checks on a finished day schedule

use serde::Serialize;

use super::timeline::DayTimeline;
use super::{LegSlot, LegState};
use crate::types::{DaySchedule, DayWindow};

/// Stay above which a single visit is flagged (8 hours)
pub const LONG_STAY_MINUTES: u32 = 8 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ConsecutiveFoodStops,
    OverBudget,
    EstimatedLeg,
    RunsPastWindow,
    LongStay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWarning {
    pub day_index: usize,
    pub kind: WarningKind,
    pub message: String,
}

impl ScheduleWarning {
    fn new(day_index: usize, kind: WarningKind, message: String) -> Self {
        Self {
            day_index,
            kind,
            message,
        }
    }
}

/// Collect warnings for one day.
pub fn validate(
    schedule: &DaySchedule,
    window: &DayWindow,
    legs: &[LegSlot],
    timeline: &DayTimeline,
) -> Vec<ScheduleWarning> {
    let day = schedule.day_index;
    let mut warnings = Vec::new();

    for pair in schedule.visits.windows(2) {
        let (prev, next) = (&pair[0].place, &pair[1].place);
        if prev.category.is_food() && next.category.is_food() {
            warnings.push(ScheduleWarning::new(
                day,
                WarningKind::ConsecutiveFoodStops,
                format!("{} and {} are back-to-back food stops", prev.name, next.name),
            ));
        }
    }

    let total = schedule.total_stay_minutes();
    if total > schedule.available_minutes {
        warnings.push(ScheduleWarning::new(
            day,
            WarningKind::OverBudget,
            format!(
                "stays add up to {} min, {} min available",
                total, schedule.available_minutes
            ),
        ));
    }

    for visit in &schedule.visits {
        if visit.place.stay_minutes > LONG_STAY_MINUTES {
            warnings.push(ScheduleWarning::new(
                day,
                WarningKind::LongStay,
                format!("{} is planned for more than 8 hours", visit.place.name),
            ));
        }
    }

    for leg in legs {
        if let LegState::Resolved { estimate } = &leg.state {
            if estimate.is_estimated {
                warnings.push(ScheduleWarning::new(
                    day,
                    WarningKind::EstimatedLeg,
                    format!(
                        "travel {} -> {} is a straight-line estimate",
                        leg.from.label, leg.to.label
                    ),
                ));
            }
        }
    }

    if timeline.runs_past(window) {
        warnings.push(ScheduleWarning::new(
            day,
            WarningKind::RunsPastWindow,
            format!("day ends at {}, after the planned end", timeline.end_of_day.format("%H:%M")),
        ));
    }

    warnings
}
