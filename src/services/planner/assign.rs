//! Cluster-to-day assignment

use tracing::debug;

use super::cluster::Cluster;
use crate::services::geo::distance_km;
use crate::types::{Coordinates, Lodging, Place};

/// Penalty per km between a day's lodging and a cluster centroid
const DISTANCE_WEIGHT: f64 = 30.0;
/// Penalty per place already assigned to a day
const LOAD_WEIGHT: f64 = 20.0;

/// Per-day lodging locations after carry-forward.
///
/// A day without a resolved lodging location inherits the previous day's.
/// Days before the first resolved lodging have no anchor and are not
/// eligible for placement. When no day has an anchor at all, every day is
/// eligible and distances count as zero so that only load decides.
#[derive(Debug, Clone)]
pub struct LodgingAnchors {
    locations: Vec<Option<Coordinates>>,
    load_only: bool,
}

impl LodgingAnchors {
    pub fn new(lodgings: &[Lodging], total_days: usize) -> Self {
        let mut own: Vec<Option<Coordinates>> = vec![None; total_days];
        for lodging in lodgings {
            if let Some(slot) = own.get_mut(lodging.day_index) {
                *slot = lodging.coordinates.filter(Coordinates::is_valid);
            }
        }

        let mut locations = Vec::with_capacity(total_days);
        let mut previous = None;
        for location in own {
            let resolved = location.or(previous);
            locations.push(resolved);
            previous = resolved;
        }

        let load_only = locations.iter().all(Option::is_none);
        Self {
            locations,
            load_only,
        }
    }

    pub fn total_days(&self) -> usize {
        self.locations.len()
    }

    /// True when no day has a lodging location
    pub fn is_load_only(&self) -> bool {
        self.load_only
    }

    pub fn location(&self, day_index: usize) -> Option<&Coordinates> {
        self.locations.get(day_index).and_then(Option::as_ref)
    }

    pub fn is_eligible(&self, day_index: usize) -> bool {
        day_index < self.locations.len() && (self.load_only || self.locations[day_index].is_some())
    }

    pub fn eligible_days(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.locations.len()).filter(|&i| self.is_eligible(i))
    }

    /// Distance from the day's anchor to `point`, zero in load-only mode
    pub fn distance_to(&self, day_index: usize, point: Option<&Coordinates>) -> f64 {
        if self.load_only {
            return 0.0;
        }
        distance_km(self.location(day_index), point)
    }
}

/// Lodging record in effect for each day, carried forward from the previous
/// day when a day has none of its own.
pub fn effective_lodgings(lodgings: &[Lodging], total_days: usize) -> Vec<Option<Lodging>> {
    let mut own: Vec<Option<&Lodging>> = vec![None; total_days];
    for lodging in lodgings {
        if let Some(slot) = own.get_mut(lodging.day_index) {
            *slot = Some(lodging);
        }
    }

    let mut effective: Vec<Option<Lodging>> = Vec::with_capacity(total_days);
    for (i, lodging) in own.into_iter().enumerate() {
        let current = match lodging {
            Some(l) => Some(l.clone()),
            None if i > 0 => effective[i - 1].clone(),
            None => None,
        };
        effective.push(current);
    }
    effective
}

/// Assign whole clusters to days, largest cluster first.
///
/// Returns one place list per day, members in cluster order.
pub fn assign_clusters<'a>(clusters: &[Cluster<'a>], anchors: &LodgingAnchors) -> Vec<Vec<&'a Place>> {
    let total_days = anchors.total_days();
    let mut days: Vec<Vec<&'a Place>> = vec![Vec::new(); total_days];
    if total_days == 0 {
        return days;
    }

    let mut order: Vec<&Cluster<'a>> = clusters.iter().collect();
    order.sort_by(|a, b| b.len().cmp(&a.len()));

    for cluster in order {
        let mut best: Option<(usize, f64)> = None;
        for day in anchors.eligible_days() {
            let dist = anchors.distance_to(day, cluster.centroid.as_ref());
            let load = days[day].len() as f64;
            let score = -(dist * DISTANCE_WEIGHT) - (load * LOAD_WEIGHT);

            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((day, score)),
            }
        }

        if let Some((day, score)) = best {
            debug!(
                "Cluster of {} assigned to day {} (score {:.1})",
                cluster.len(),
                day,
                score
            );
            days[day].extend(cluster.members.iter().copied());
        }
    }

    days
}
