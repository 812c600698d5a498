//! Itinerary distribution
//!
//! Pipeline: geo clustering, cluster-to-day assignment, intra-day
//! sequencing, overflow reassignment. Everything here is synchronous and
//! deterministic; travel times are annotated afterwards by the itinerary
//! assembler.

pub mod assign;
pub mod budget;
pub mod cluster;
pub mod input;
pub mod overflow;
pub mod sequence;

use tracing::info;

use crate::error::PlannerResult;
use crate::types::{DaySchedule, DayWindow, DistributionResult, Place, PlaceCategory, TripInput, VisitLeg};

pub use assign::{assign_clusters, effective_lodgings, LodgingAnchors};
pub use budget::available_minutes;
pub use cluster::cluster_places;
pub use input::{build_trip_input, validate_input};
pub use overflow::reassign_overflow;
pub use sequence::sequence_day;

/// Distribute the selected places over the trip days.
///
/// Places of category lodging are not distributed and come back in
/// `excluded`. Every other place ends up in exactly one day or in
/// `unplaceable`.
pub fn distribute(input: &TripInput) -> PlannerResult<DistributionResult> {
    validate_input(input)?;

    let total_days = input.total_days();
    let mut windows: Vec<&DayWindow> = input.windows.iter().collect();
    windows.sort_by_key(|w| w.day_index);

    let (lodging_places, candidates): (Vec<&Place>, Vec<&Place>) = input
        .places
        .iter()
        .partition(|p| p.category == PlaceCategory::Lodging);
    let excluded: Vec<String> = lodging_places.iter().map(|p| p.id.clone()).collect();

    if total_days == 0 {
        info!("No trip days, {} places unplaceable", candidates.len());
        return Ok(DistributionResult {
            days: Vec::new(),
            unplaceable: candidates.iter().map(|p| p.id.clone()).collect(),
            excluded,
        });
    }

    let clusters = cluster_places(&candidates);
    let anchors = LodgingAnchors::new(&input.lodgings, total_days);
    let assigned = assign_clusters(&clusters, &anchors);

    let available: Vec<u32> = windows.iter().map(|w| available_minutes(w)).collect();

    let mut finalized: Vec<Vec<&Place>> = Vec::with_capacity(total_days);
    let mut overflow: Vec<&Place> = Vec::new();
    for (day, places) in assigned.iter().enumerate() {
        let seq = sequence_day(places, windows[day], available[day], anchors.location(day));
        finalized.push(seq.accepted);
        overflow.extend(seq.overflow);
    }

    let overflow_count = overflow.len();
    let unplaceable = reassign_overflow(&mut finalized, overflow, &anchors, &available);

    let lodgings = effective_lodgings(&input.lodgings, total_days);
    let days: Vec<DaySchedule> = finalized
        .into_iter()
        .zip(lodgings)
        .enumerate()
        .map(|(day, (places, lodging))| {
            let mut schedule = DaySchedule {
                day_index: day,
                date: windows[day].date,
                visits: places
                    .into_iter()
                    .map(|p| VisitLeg {
                        place: p.clone(),
                        arrival_order_index: 0,
                    })
                    .collect(),
                lodging,
                available_minutes: available[day],
            };
            schedule.renumber();
            schedule
        })
        .collect();

    let result = DistributionResult {
        days,
        unplaceable: unplaceable.iter().map(|p| p.id.clone()).collect(),
        excluded,
    };

    info!(
        "Distributed {} places over {} days ({} clusters, {} overflow, {} unplaceable, {} excluded)",
        result.assigned_count(),
        total_days,
        clusters.len(),
        overflow_count,
        result.unplaceable.len(),
        result.excluded.len()
    );

    Ok(result)
}
