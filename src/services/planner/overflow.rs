//! Second-chance placement of places cut from their day

use tracing::debug;

use super::assign::LodgingAnchors;
use crate::types::Place;

/// Penalty per km between a day's lodging and the place
const DISTANCE_WEIGHT: f64 = 10.0;
/// Distance beyond which a day is considered out of the way
const FAR_THRESHOLD_KM: f64 = 20.0;
const FAR_PENALTY: f64 = 500.0;

/// Append each overflow place to the best-scoring day that still has room.
///
/// `days` holds the finalized visits per day and grows as places are
/// appended; `available` is each day's stay budget. The food adjacency rule
/// is not applied here. Returns the places that fit nowhere, in input order.
pub fn reassign_overflow<'a>(
    days: &mut [Vec<&'a Place>],
    overflow: Vec<&'a Place>,
    anchors: &LodgingAnchors,
    available: &[u32],
) -> Vec<&'a Place> {
    let mut unplaceable = Vec::new();

    for place in overflow {
        let mut best: Option<(usize, f64, u32)> = None;

        for day in anchors.eligible_days() {
            let used = days[day]
                .iter()
                .fold(0u32, |total, p| total.saturating_add(p.stay_minutes));
            let free = available[day].saturating_sub(used);
            let dist = anchors.distance_to(day, place.coordinates.as_ref());

            let mut score = free as f64 - dist * DISTANCE_WEIGHT;
            if dist > FAR_THRESHOLD_KM {
                score -= FAR_PENALTY;
            }

            match best {
                Some((_, top, _)) if score <= top => {}
                _ => best = Some((day, score, free)),
            }
        }

        match best {
            Some((day, score, free)) if score > 0.0 && free >= place.stay_minutes => {
                debug!("Overflow place {} moved to day {} (score {:.1})", place.id, day, score);
                days[day].push(place);
            }
            _ => {
                debug!("Overflow place {} fits no day", place.id);
                unplaceable.push(place);
            }
        }
    }

    unplaceable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, Lodging, PlaceCategory};

    fn lodging(day_index: usize, lat: f64, lng: f64) -> Lodging {
        Lodging {
            day_index,
            name: "Hotel".to_string(),
            coordinates: Some(Coordinates::new(lat, lng)),
        }
    }

    fn place(id: &str, lat: f64, lng: f64, stay: u32) -> Place {
        Place::new(id, id, PlaceCategory::Sightseeing, Some(Coordinates::new(lat, lng)), stay)
    }

    #[test]
    fn test_moves_to_day_with_room() {
        let busy = place("busy", 34.69, 135.50, 500);
        let extra = place("extra", 34.70, 135.50, 60);
        let anchors = LodgingAnchors::new(&[lodging(0, 34.69, 135.50)], 2);
        let mut days = vec![vec![&busy], vec![]];

        let left = reassign_overflow(&mut days, vec![&extra], &anchors, &[540, 540]);

        assert!(left.is_empty());
        assert_eq!(days[1].len(), 1);
        assert_eq!(days[1][0].id, "extra");
    }

    #[test]
    fn test_no_room_anywhere_is_unplaceable() {
        let a = place("a", 34.69, 135.50, 60);
        let b = place("b", 34.69, 135.50, 60);
        let anchors = LodgingAnchors::new(&[lodging(0, 34.69, 135.50)], 1);
        let mut days = vec![vec![&a]];

        let left = reassign_overflow(&mut days, vec![&b], &anchors, &[90]);

        assert_eq!(left.len(), 1);
        assert_eq!(days[0].len(), 1);
    }

    #[test]
    fn test_far_place_is_unplaceable() {
        // Kyoto place, lodging in Osaka: ~43 km, far penalty outweighs free time
        let kyoto = place("kyoto", 35.0116, 135.7681, 60);
        let anchors = LodgingAnchors::new(&[lodging(0, 34.6937, 135.5023)], 1);
        let mut days: Vec<Vec<&Place>> = vec![vec![]];

        let left = reassign_overflow(&mut days, vec![&kyoto], &anchors, &[540]);

        assert_eq!(left.len(), 1);
        assert!(days[0].is_empty());
    }

    #[test]
    fn test_free_time_shrinks_as_places_are_appended() {
        let a = place("a", 34.69, 135.50, 60);
        let b = place("b", 34.69, 135.50, 60);
        let anchors = LodgingAnchors::new(&[lodging(0, 34.69, 135.50)], 1);
        let mut days: Vec<Vec<&Place>> = vec![vec![]];

        let left = reassign_overflow(&mut days, vec![&a, &b], &anchors, &[100]);

        assert_eq!(days[0].len(), 1);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, "b");
    }

    #[test]
    fn test_load_only_mode_uses_free_time() {
        let a = place("a", 34.69, 135.50, 60);
        let anchors = LodgingAnchors::new(&[], 2);
        let filler = place("filler", 34.69, 135.50, 300);
        let mut days = vec![vec![&filler], vec![]];

        let left = reassign_overflow(&mut days, vec![&a], &anchors, &[540, 540]);

        assert!(left.is_empty());
        assert_eq!(days[1][0].id, "a");
    }
}
