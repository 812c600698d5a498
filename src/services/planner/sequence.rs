//! Intra-day ordering: meal pinning, nearest-neighbour walk, budget cut-off
//! and the food adjacency rule.
//!
//! The walk is greedy nearest-neighbour. It gives a reasonable, explainable
//! route, not a minimal tour; a 2-opt pass over `accepted` could refine it
//! without changing this contract.

use crate::services::geo::distance_km;
use crate::types::{Coordinates, DayWindow, Place, PlaceCategory};

/// Lunch target, 12:00
pub const LUNCH_TARGET: u32 = 12 * 60;
/// Dinner target, 18:00
pub const DINNER_TARGET: u32 = 18 * 60;

/// Outcome of sequencing one day
#[derive(Debug, Clone, Default)]
pub struct DaySequence<'a> {
    pub accepted: Vec<&'a Place>,
    pub overflow: Vec<&'a Place>,
}

/// Order the places assigned to one day.
///
/// `available` is the day's stay budget, `start` the lodging location the
/// walk begins from.
pub fn sequence_day<'a>(
    places: &[&'a Place],
    window: &DayWindow,
    available: u32,
    start: Option<&Coordinates>,
) -> DaySequence<'a> {
    let mut pool: Vec<&'a Place> = places.to_vec();

    let mut lunch = if window.spans(LUNCH_TARGET) {
        take_nearest_dining(&mut pool, start)
    } else {
        None
    };
    let mut dinner = if window.spans(DINNER_TARGET) {
        take_nearest_dining(&mut pool, start)
    } else {
        None
    };

    let mut result = DaySequence::default();
    let mut current: Option<Coordinates> = start.copied();
    let mut used: u32 = 0;

    loop {
        let clock = window.start.saturating_add(used);
        let no_others = pool.is_empty();

        let next = if lunch.is_some() && (clock >= LUNCH_TARGET || no_others) {
            lunch.take()
        } else if dinner.is_some() && (clock >= DINNER_TARGET || (no_others && lunch.is_none())) {
            dinner.take()
        } else if let Some(i) = nearest_index(&pool, current.as_ref()) {
            Some(pool.remove(i))
        } else {
            None
        };

        let Some(candidate) = next else { break };

        if used.saturating_add(candidate.stay_minutes) > available {
            result.overflow.push(candidate);
            result.overflow.append(&mut pool);
            result.overflow.extend(lunch.take());
            result.overflow.extend(dinner.take());
            break;
        }

        let follows_food = result
            .accepted
            .last()
            .is_some_and(|prev| prev.category.is_food());
        if follows_food && candidate.category.is_food() {
            result.overflow.push(candidate);
            continue;
        }

        used = used.saturating_add(candidate.stay_minutes);
        if let Some(at) = candidate.coordinates {
            current = Some(at);
        }
        result.accepted.push(candidate);
    }

    result
}

/// Remove and return the dining place nearest to `from`. First in order wins
/// on ties.
fn take_nearest_dining<'a>(pool: &mut Vec<&'a Place>, from: Option<&Coordinates>) -> Option<&'a Place> {
    let mut best: Option<(usize, f64)> = None;
    for (i, place) in pool.iter().enumerate() {
        if place.category != PlaceCategory::Dining {
            continue;
        }
        let d = distance_km(from, place.coordinates.as_ref());
        if best.map_or(true, |(_, top)| d < top) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| pool.remove(i))
}

fn nearest_index(pool: &[&Place], from: Option<&Coordinates>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, place) in pool.iter().enumerate() {
        let d = distance_km(from, place.coordinates.as_ref());
        if best.map_or(true, |(_, top)| d < top) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}
