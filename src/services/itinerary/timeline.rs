//! Arrival/departure times for a day's visits.
//!
//! Walks the visits in order from the window start: arrival is the previous
//! departure plus the travel time of the connecting leg, departure is arrival
//! plus the stay. Legs still waiting for the oracle count as zero minutes and
//! flag the visit. Order is never changed here.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use crate::types::{DaySchedule, DayWindow};

/// Travel time of one leg as known right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegTime {
    Pending,
    Minutes(u32),
}

impl LegTime {
    fn minutes(self) -> u32 {
        match self {
            LegTime::Pending => 0,
            LegTime::Minutes(m) => m,
        }
    }
}

/// Computed times for one visit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitTiming {
    pub place_id: String,
    pub arrival: NaiveTime,
    pub departure: NaiveTime,
    pub travel_minutes_from_previous: u32,
    /// Travel from the previous visit is not resolved yet
    pub pending_travel: bool,
}

/// Timeline of a whole day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTimeline {
    pub visits: Vec<VisitTiming>,
    /// Travel back to the lodging, `None` without a return leg or while pending
    pub return_to_lodging_minutes: Option<u32>,
    /// Arrival back at the lodging, or the last departure without a return leg
    pub end_of_day: NaiveTime,
    pub total_travel_minutes: u32,
    pub total_stay_minutes: u32,
}

impl DayTimeline {
    /// True if the day ends after the window closes
    pub fn runs_past(&self, window: &DayWindow) -> bool {
        minutes_of_day(self.end_of_day) > window.end
    }
}

fn clock(minutes: u32) -> NaiveTime {
    let secs = minutes.saturating_mul(60).min(24 * 60 * 60 - 1);
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or(NaiveTime::MIN)
}

fn minutes_of_day(t: NaiveTime) -> u32 {
    t.num_seconds_from_midnight() / 60
}

/// Compute the timeline of one day.
///
/// `between` holds the travel time between consecutive visits
/// (`visits.len() - 1` entries, missing entries count as pending);
/// `return_leg` the travel from the last visit to the lodging, if any.
pub fn compute_day_timeline(
    schedule: &DaySchedule,
    window: &DayWindow,
    between: &[LegTime],
    return_leg: Option<LegTime>,
) -> DayTimeline {
    let mut visits = Vec::with_capacity(schedule.visits.len());
    let mut cursor = window.start;
    let mut total_travel: u32 = 0;
    let mut total_stay: u32 = 0;

    for (i, visit) in schedule.visits.iter().enumerate() {
        let travel = if i == 0 {
            LegTime::Minutes(0)
        } else {
            between.get(i - 1).copied().unwrap_or(LegTime::Pending)
        };

        let arrival = cursor.saturating_add(travel.minutes());
        let departure = arrival.saturating_add(visit.place.stay_minutes);

        visits.push(VisitTiming {
            place_id: visit.place.id.clone(),
            arrival: clock(arrival),
            departure: clock(departure),
            travel_minutes_from_previous: travel.minutes(),
            pending_travel: travel == LegTime::Pending,
        });

        total_travel = total_travel.saturating_add(travel.minutes());
        total_stay = total_stay.saturating_add(visit.place.stay_minutes);
        cursor = departure;
    }

    let return_to_lodging_minutes = match return_leg {
        Some(LegTime::Minutes(m)) if !schedule.visits.is_empty() => Some(m),
        _ => None,
    };
    let return_minutes = return_to_lodging_minutes.unwrap_or(0);

    DayTimeline {
        visits,
        return_to_lodging_minutes,
        end_of_day: clock(cursor.saturating_add(return_minutes)),
        total_travel_minutes: total_travel.saturating_add(return_minutes),
        total_stay_minutes: total_stay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, Place, PlaceCategory, VisitLeg};
    use chrono::NaiveDate;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn window(start: u32, end: u32) -> DayWindow {
        DayWindow::new(0, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(), start, end)
    }

    fn schedule(stays: &[u32]) -> DaySchedule {
        let mut day = DaySchedule {
            day_index: 0,
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            visits: stays
                .iter()
                .enumerate()
                .map(|(i, &stay)| VisitLeg {
                    place: Place::new(
                        format!("p{}", i),
                        format!("Place {}", i),
                        PlaceCategory::Sightseeing,
                        Some(Coordinates::new(34.69, 135.50)),
                        stay,
                    ),
                    arrival_order_index: 0,
                })
                .collect(),
            lodging: None,
            available_minutes: 540,
        };
        day.renumber();
        day
    }

    #[test]
    fn test_walks_from_window_start() {
        let day = schedule(&[60, 90, 30]);
        let between = [LegTime::Minutes(15), LegTime::Minutes(20)];

        let tl = compute_day_timeline(&day, &window(600, 1320), &between, Some(LegTime::Minutes(25)));

        assert_eq!(tl.visits[0].arrival, hm(10, 0));
        assert_eq!(tl.visits[0].departure, hm(11, 0));
        assert_eq!(tl.visits[1].arrival, hm(11, 15));
        assert_eq!(tl.visits[1].departure, hm(12, 45));
        assert_eq!(tl.visits[2].arrival, hm(13, 5));
        assert_eq!(tl.visits[2].departure, hm(13, 35));
        assert_eq!(tl.return_to_lodging_minutes, Some(25));
        assert_eq!(tl.end_of_day, hm(14, 0));
        assert_eq!(tl.total_travel_minutes, 60);
        assert_eq!(tl.total_stay_minutes, 180);
    }

    #[test]
    fn test_pending_leg_counts_zero_and_is_flagged() {
        let day = schedule(&[60, 60]);

        let tl = compute_day_timeline(&day, &window(600, 1320), &[LegTime::Pending], Some(LegTime::Pending));

        assert!(!tl.visits[0].pending_travel);
        assert!(tl.visits[1].pending_travel);
        assert_eq!(tl.visits[1].arrival, hm(11, 0));
        assert_eq!(tl.return_to_lodging_minutes, None);
        assert_eq!(tl.end_of_day, hm(12, 0));
    }

    #[test]
    fn test_runs_past_window() {
        let day = schedule(&[120, 120]);
        let tl = compute_day_timeline(&day, &window(600, 840), &[LegTime::Minutes(30)], None);

        assert_eq!(tl.end_of_day, hm(14, 30));
        assert!(tl.runs_past(&window(600, 840)));
        assert!(!tl.runs_past(&window(600, 900)));
    }

    #[test]
    fn test_clamps_at_midnight() {
        let day = schedule(&[240]);
        let tl = compute_day_timeline(&day, &window(1260, 1440), &[], None);

        assert_eq!(tl.visits[0].departure, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn test_huge_stay_saturates() {
        let day = schedule(&[60, u32::MAX]);
        let tl = compute_day_timeline(&day, &window(600, 1320), &[LegTime::Minutes(10)], Some(LegTime::Minutes(10)));

        assert_eq!(tl.total_stay_minutes, u32::MAX);
        assert_eq!(tl.end_of_day, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        assert!(tl.runs_past(&window(600, 1320)));
    }

    #[test]
    fn test_empty_day() {
        let day = schedule(&[]);
        let tl = compute_day_timeline(&day, &window(600, 1320), &[], Some(LegTime::Minutes(10)));

        assert!(tl.visits.is_empty());
        assert_eq!(tl.end_of_day, hm(10, 0));
        assert_eq!(tl.return_to_lodging_minutes, None);
    }
}
