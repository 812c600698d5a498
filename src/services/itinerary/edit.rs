//! User edits on a day schedule

use serde::{Deserialize, Serialize};

use crate::defaults::MIN_STAY_MINUTES;
use crate::error::{PlannerError, PlannerResult};
use crate::types::{DaySchedule, Place, VisitLeg};

/// One edit to the visit list of a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScheduleEdit {
    Delete {
        day: usize,
        position: usize,
    },
    Swap {
        day: usize,
        a: usize,
        b: usize,
    },
    /// Swap with the neighbour in the direction of `offset`. A move past
    /// either end of the day does nothing.
    Move {
        day: usize,
        position: usize,
        offset: i32,
    },
    Insert {
        day: usize,
        position: usize,
        place: Place,
    },
    UpdateStay {
        day: usize,
        position: usize,
        minutes: u32,
    },
}

impl ScheduleEdit {
    pub fn day(&self) -> usize {
        match self {
            ScheduleEdit::Delete { day, .. }
            | ScheduleEdit::Swap { day, .. }
            | ScheduleEdit::Move { day, .. }
            | ScheduleEdit::Insert { day, .. }
            | ScheduleEdit::UpdateStay { day, .. } => *day,
        }
    }
}

fn check_position(schedule: &DaySchedule, position: usize, len: usize) -> PlannerResult<()> {
    if position >= len {
        return Err(PlannerError::PositionOutOfRange {
            day_index: schedule.day_index,
            position,
            len: schedule.visits.len(),
        });
    }
    Ok(())
}

/// Apply `edit` to the schedule of its day and renumber the visits.
///
/// Returns the removed place for `Delete`. The caller checks the day index
/// and place-id uniqueness across the whole itinerary.
pub(crate) fn apply_to_day(schedule: &mut DaySchedule, edit: ScheduleEdit) -> PlannerResult<Option<Place>> {
    let len = schedule.visits.len();
    let mut removed = None;

    match edit {
        ScheduleEdit::Delete { position, .. } => {
            check_position(schedule, position, len)?;
            removed = Some(schedule.visits.remove(position).place);
        }
        ScheduleEdit::Swap { a, b, .. } => {
            check_position(schedule, a, len)?;
            check_position(schedule, b, len)?;
            schedule.visits.swap(a, b);
        }
        ScheduleEdit::Move { position, offset, .. } => {
            check_position(schedule, position, len)?;
            let target = position as i64 + offset.signum() as i64;
            if offset != 0 && target >= 0 && (target as usize) < len {
                schedule.visits.swap(position, target as usize);
            }
        }
        ScheduleEdit::Insert { position, place, .. } => {
            // position == len appends
            check_position(schedule, position, len + 1)?;
            schedule.visits.insert(
                position,
                VisitLeg {
                    place,
                    arrival_order_index: position,
                },
            );
        }
        ScheduleEdit::UpdateStay { position, minutes, .. } => {
            check_position(schedule, position, len)?;
            schedule.visits[position].place.stay_minutes = minutes.max(MIN_STAY_MINUTES);
        }
    }

    schedule.renumber();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaceCategory;
    use chrono::NaiveDate;

    fn place(id: &str) -> Place {
        Place::new(id, id, PlaceCategory::Sightseeing, None, 60)
    }

    fn day(ids: &[&str]) -> DaySchedule {
        let mut schedule = DaySchedule {
            day_index: 0,
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            visits: ids
                .iter()
                .map(|id| VisitLeg {
                    place: place(id),
                    arrival_order_index: 0,
                })
                .collect(),
            lodging: None,
            available_minutes: 540,
        };
        schedule.renumber();
        schedule
    }

    fn ids(schedule: &DaySchedule) -> Vec<&str> {
        schedule.visits.iter().map(|v| v.place.id.as_str()).collect()
    }

    #[test]
    fn test_delete() {
        let mut d = day(&["a", "b", "c"]);
        let removed = apply_to_day(&mut d, ScheduleEdit::Delete { day: 0, position: 1 }).unwrap();

        assert_eq!(removed.map(|p| p.id), Some("b".to_string()));
        assert_eq!(ids(&d), vec!["a", "c"]);
        assert_eq!(d.visits[1].arrival_order_index, 1);
    }

    #[test]
    fn test_swap() {
        let mut d = day(&["a", "b", "c"]);
        apply_to_day(&mut d, ScheduleEdit::Swap { day: 0, a: 0, b: 2 }).unwrap();
        assert_eq!(ids(&d), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_move_up_and_down() {
        let mut d = day(&["a", "b", "c"]);
        apply_to_day(&mut d, ScheduleEdit::Move { day: 0, position: 1, offset: -1 }).unwrap();
        assert_eq!(ids(&d), vec!["b", "a", "c"]);

        apply_to_day(&mut d, ScheduleEdit::Move { day: 0, position: 1, offset: 1 }).unwrap();
        assert_eq!(ids(&d), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_past_edge_is_noop() {
        let mut d = day(&["a", "b"]);
        apply_to_day(&mut d, ScheduleEdit::Move { day: 0, position: 0, offset: -1 }).unwrap();
        apply_to_day(&mut d, ScheduleEdit::Move { day: 0, position: 1, offset: 1 }).unwrap();
        assert_eq!(ids(&d), vec!["a", "b"]);
    }

    #[test]
    fn test_insert_and_append() {
        let mut d = day(&["a", "b"]);
        apply_to_day(&mut d, ScheduleEdit::Insert { day: 0, position: 1, place: place("x") }).unwrap();
        apply_to_day(&mut d, ScheduleEdit::Insert { day: 0, position: 3, place: place("y") }).unwrap();

        assert_eq!(ids(&d), vec!["a", "x", "b", "y"]);
        assert_eq!(d.visits[3].arrival_order_index, 3);
    }

    #[test]
    fn test_update_stay_clamps() {
        let mut d = day(&["a"]);
        apply_to_day(&mut d, ScheduleEdit::UpdateStay { day: 0, position: 0, minutes: 5 }).unwrap();
        assert_eq!(d.visits[0].place.stay_minutes, MIN_STAY_MINUTES);

        apply_to_day(&mut d, ScheduleEdit::UpdateStay { day: 0, position: 0, minutes: 45 }).unwrap();
        assert_eq!(d.visits[0].place.stay_minutes, 45);
    }

    #[test]
    fn test_position_out_of_range() {
        let mut d = day(&["a"]);
        assert_eq!(
            apply_to_day(&mut d, ScheduleEdit::Delete { day: 0, position: 1 }).unwrap_err(),
            PlannerError::PositionOutOfRange { day_index: 0, position: 1, len: 1 }
        );
        assert!(apply_to_day(&mut d, ScheduleEdit::Insert { day: 0, position: 3, place: place("x") }).is_err());
    }

    #[test]
    fn test_edit_deserializes_tagged() {
        let json = r#"{"type": "updateStay", "day": 1, "position": 0, "minutes": 90}"#;
        let edit: ScheduleEdit = serde_json::from_str(json).unwrap();
        assert_eq!(edit, ScheduleEdit::UpdateStay { day: 1, position: 0, minutes: 90 });
        assert_eq!(edit.day(), 1);
    }
}
