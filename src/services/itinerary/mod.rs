//! Annotated itinerary
//!
//! Owns the distributed day schedules together with one travel leg per
//! consecutive visit pair plus the final visit to the day's lodging. Each
//! unresolved leg is looked up by its own tokio task; results come back over
//! an mpsc channel keyed by [`LegId`] and are applied by the owner, so the
//! schedule itself is never shared. Dropping (or discarding) the itinerary
//! cancels every lookup still in flight.

pub mod edit;
pub mod timeline;
pub mod warnings;

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{PlannerError, PlannerResult};
use crate::services::travel_time::{fallback_estimate, TravelTimeOracle};
use crate::types::{
    Coordinates, DaySchedule, DayWindow, DistributionResult, Lodging, Place, TravelEstimate,
    TravelMode,
};

pub use edit::ScheduleEdit;
pub use timeline::{compute_day_timeline, DayTimeline, LegTime};
pub use warnings::ScheduleWarning;

/// Identifier of a leg, unique within one itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LegId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    Visit,
    Lodging,
}

/// One end of a leg: a visited place (labelled by id) or the lodging
/// (labelled by name)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegEndpoint {
    pub kind: EndpointKind,
    pub label: String,
    pub coordinates: Option<Coordinates>,
}

impl LegEndpoint {
    fn visit(place: &Place) -> Self {
        Self {
            kind: EndpointKind::Visit,
            label: place.id.clone(),
            coordinates: place.coordinates,
        }
    }

    fn lodging(lodging: &Lodging) -> Self {
        Self {
            kind: EndpointKind::Lodging,
            label: lodging.name.clone(),
            coordinates: lodging.coordinates,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LegState {
    Pending,
    Resolved { estimate: TravelEstimate },
}

impl LegState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LegState::Pending)
    }

    fn time(&self) -> LegTime {
        match self {
            LegState::Pending => LegTime::Pending,
            LegState::Resolved { estimate } => LegTime::Minutes(estimate.duration_minutes),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegSlot {
    pub id: LegId,
    pub from: LegEndpoint,
    pub to: LegEndpoint,
    pub state: LegState,
    /// Cancels the lookup task while the leg is pending
    #[serde(skip)]
    lookup: Option<CancellationToken>,
}

impl LegSlot {
    pub fn resolved(id: LegId, from: LegEndpoint, to: LegEndpoint, estimate: TravelEstimate) -> Self {
        Self {
            id,
            from,
            to,
            state: LegState::Resolved { estimate },
            lookup: None,
        }
    }

    fn connects(&self, from: &LegEndpoint, to: &LegEndpoint) -> bool {
        &self.from == from && &self.to == to
    }
}

#[derive(Debug)]
struct LegUpdate {
    id: LegId,
    estimate: TravelEstimate,
}

/// One day of the itinerary
#[derive(Debug, Clone)]
pub struct ItineraryDay {
    pub schedule: DaySchedule,
    pub window: DayWindow,
    /// Visit-to-visit legs in order, then the return leg to the lodging
    pub legs: Vec<LegSlot>,
}

impl ItineraryDay {
    pub fn return_leg(&self) -> Option<&LegSlot> {
        self.legs.last().filter(|l| l.to.kind == EndpointKind::Lodging)
    }

    pub fn timeline(&self) -> DayTimeline {
        let between: Vec<LegTime> = self
            .legs
            .iter()
            .filter(|l| l.to.kind == EndpointKind::Visit)
            .map(|l| l.state.time())
            .collect();
        let return_leg = self.return_leg().map(|l| l.state.time());
        compute_day_timeline(&self.schedule, &self.window, &between, return_leg)
    }
}

/// Endpoint pairs a day's visit list calls for
fn wanted_legs(schedule: &DaySchedule) -> Vec<(LegEndpoint, LegEndpoint)> {
    let mut legs: Vec<(LegEndpoint, LegEndpoint)> = schedule
        .visits
        .windows(2)
        .map(|pair| (LegEndpoint::visit(&pair[0].place), LegEndpoint::visit(&pair[1].place)))
        .collect();

    if let (Some(last), Some(lodging)) = (schedule.visits.last(), schedule.lodging.as_ref()) {
        legs.push((LegEndpoint::visit(&last.place), LegEndpoint::lodging(lodging)));
    }
    legs
}

/// What an edit changed
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    /// Legs created by the edit (spawned or answered from cache)
    pub new_legs: usize,
    /// Legs kept with their id and state
    pub reused_legs: usize,
    pub removed: Option<Place>,
}

/// Serializable snapshot of one day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    #[serde(flatten)]
    pub schedule: DaySchedule,
    pub legs: Vec<LegSlot>,
    pub timeline: DayTimeline,
}

/// Serializable snapshot of the itinerary, pending legs included
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryView {
    pub days: Vec<DayView>,
    pub unplaceable: Vec<String>,
    pub excluded: Vec<String>,
    pub mode: TravelMode,
    pub warnings: Vec<ScheduleWarning>,
    /// True once no leg is pending
    pub complete: bool,
}

pub struct Itinerary {
    days: Vec<ItineraryDay>,
    unplaceable: Vec<String>,
    excluded: Vec<String>,
    mode: TravelMode,
    oracle: Arc<TravelTimeOracle>,
    next_leg_id: u64,
    updates_tx: mpsc::UnboundedSender<LegUpdate>,
    updates_rx: mpsc::UnboundedReceiver<LegUpdate>,
    cancel: CancellationToken,
}

impl Itinerary {
    /// Build the itinerary from a distribution result and start resolving
    /// its legs. Must be called inside a tokio runtime.
    ///
    /// Every day of `result` needs a window with the same day index, and no
    /// place may appear on more than one visit.
    pub fn assemble(
        result: DistributionResult,
        windows: &[DayWindow],
        mode: TravelMode,
        oracle: Arc<TravelTimeOracle>,
    ) -> PlannerResult<Self> {
        let mut days = Vec::with_capacity(result.days.len());
        let mut place_ids = HashSet::new();
        for schedule in result.days {
            for visit in &schedule.visits {
                if !place_ids.insert(visit.place.id.clone()) {
                    return Err(PlannerError::DuplicatePlace(visit.place.id.clone()));
                }
            }
            if days
                .iter()
                .any(|d: &ItineraryDay| d.schedule.day_index == schedule.day_index)
            {
                return Err(PlannerError::DuplicateDayWindow(schedule.day_index));
            }
            let window = windows
                .iter()
                .find(|w| w.day_index == schedule.day_index)
                .cloned()
                .ok_or(PlannerError::DayOutOfRange {
                    day_index: schedule.day_index,
                    total_days: windows.len(),
                })?;
            days.push(ItineraryDay {
                schedule,
                window,
                legs: Vec::new(),
            });
        }

        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let mut itinerary = Self {
            days,
            unplaceable: result.unplaceable,
            excluded: result.excluded,
            mode,
            oracle,
            next_leg_id: 0,
            updates_tx,
            updates_rx,
            cancel: CancellationToken::new(),
        };

        for pos in 0..itinerary.days.len() {
            itinerary.rebuild_legs(pos);
        }

        info!(
            "Assembled itinerary: {} days, {} legs ({} pending, {} routing)",
            itinerary.days.len(),
            itinerary.leg_count(),
            itinerary.pending_legs(),
            itinerary.oracle.routing_name()
        );

        Ok(itinerary)
    }

    pub fn leg_count(&self) -> usize {
        self.days.iter().map(|d| d.legs.len()).sum()
    }

    pub fn pending_legs(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| &d.legs)
            .filter(|l| l.state.is_pending())
            .count()
    }

    /// Wait for the next leg result and apply it. Returns `None` once no leg
    /// is pending. Results for legs that no longer exist are skipped.
    pub async fn next_update(&mut self) -> Option<LegId> {
        while self.pending_legs() > 0 {
            let update = self.updates_rx.recv().await?;
            let id = update.id;
            if self.apply_update(update) {
                return Some(id);
            }
        }
        None
    }

    /// Wait until every leg is resolved.
    pub async fn resolve_all(&mut self) {
        while self.next_update().await.is_some() {}
    }

    fn apply_update(&mut self, update: LegUpdate) -> bool {
        let slot = self
            .days
            .iter_mut()
            .flat_map(|d| d.legs.iter_mut())
            .find(|l| l.id == update.id && l.state.is_pending());

        match slot {
            Some(slot) => {
                slot.state = LegState::Resolved {
                    estimate: update.estimate,
                };
                slot.lookup = None;
                true
            }
            None => {
                debug!("Ignoring result for replaced leg {}", update.id.0);
                false
            }
        }
    }

    /// Apply a user edit to one day and re-resolve only the legs it changed.
    pub fn apply_edit(&mut self, edit: ScheduleEdit) -> PlannerResult<EditOutcome> {
        let day_index = edit.day();
        let pos = self
            .days
            .iter()
            .position(|d| d.schedule.day_index == day_index)
            .ok_or(PlannerError::DayOutOfRange {
                day_index,
                total_days: self.days.len(),
            })?;

        let inserted = match &edit {
            ScheduleEdit::Insert { place, .. } => {
                let taken = self
                    .days
                    .iter()
                    .flat_map(|d| &d.schedule.visits)
                    .any(|v| v.place.id == place.id);
                if taken {
                    return Err(PlannerError::DuplicatePlace(place.id.clone()));
                }
                Some(place.id.clone())
            }
            _ => None,
        };

        let removed = edit::apply_to_day(&mut self.days[pos].schedule, edit)?;
        if let Some(id) = inserted {
            self.unplaceable.retain(|u| u != &id);
        }

        let (new_legs, reused_legs) = self.rebuild_legs(pos);
        debug!(
            "Edited day {}: {} new legs, {} reused",
            day_index, new_legs, reused_legs
        );

        Ok(EditOutcome {
            new_legs,
            reused_legs,
            removed,
        })
    }

    /// Rebuild a day's leg list from its visits. Legs whose endpoints did not
    /// change keep their id and state; dropped legs have their lookup
    /// cancelled.
    fn rebuild_legs(&mut self, pos: usize) -> (usize, usize) {
        let wanted = wanted_legs(&self.days[pos].schedule);
        let mut old: Vec<Option<LegSlot>> = std::mem::take(&mut self.days[pos].legs)
            .into_iter()
            .map(Some)
            .collect();

        let mut legs = Vec::with_capacity(wanted.len());
        let (mut new_legs, mut reused_legs) = (0, 0);

        for (from, to) in wanted {
            let existing = old
                .iter_mut()
                .find(|slot| matches!(slot, Some(s) if s.connects(&from, &to)))
                .and_then(Option::take);

            match existing {
                Some(slot) => {
                    reused_legs += 1;
                    legs.push(slot);
                }
                None => {
                    new_legs += 1;
                    legs.push(self.open_leg(from, to));
                }
            }
        }

        for slot in old.into_iter().flatten() {
            if let Some(token) = slot.lookup {
                token.cancel();
            }
        }

        self.days[pos].legs = legs;
        (new_legs, reused_legs)
    }

    /// Create a leg, answering from cache or the fallback where possible and
    /// spawning a lookup task otherwise.
    fn open_leg(&mut self, from: LegEndpoint, to: LegEndpoint) -> LegSlot {
        let id = LegId(self.next_leg_id);
        self.next_leg_id += 1;

        let (origin, destination) = match (from.coordinates, to.coordinates) {
            (Some(o), Some(d)) if o.is_valid() && d.is_valid() => (o, d),
            (o, d) => {
                let estimate = fallback_estimate(o.as_ref(), d.as_ref());
                return LegSlot::resolved(id, from, to, estimate);
            }
        };

        if let Some(estimate) = self.oracle.cached(&origin, &destination, self.mode) {
            return LegSlot::resolved(id, from, to, estimate);
        }

        let token = self.cancel.child_token();
        let task_token = token.clone();
        let oracle = Arc::clone(&self.oracle);
        let tx = self.updates_tx.clone();
        let mode = self.mode;

        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!("Lookup for leg {} cancelled", id.0);
                }
                estimate = oracle.resolve(Some(&origin), Some(&destination), mode) => {
                    // Receiver gone means the itinerary was dropped meanwhile
                    let _ = tx.send(LegUpdate { id, estimate });
                }
            }
        });

        LegSlot {
            id,
            from,
            to,
            state: LegState::Pending,
            lookup: Some(token),
        }
    }

    /// Snapshot with timelines and warnings as of now
    pub fn view(&self) -> ItineraryView {
        let mut found = Vec::new();
        let days = self
            .days
            .iter()
            .map(|day| {
                let timeline = day.timeline();
                found.extend(warnings::validate(&day.schedule, &day.window, &day.legs, &timeline));
                DayView {
                    schedule: day.schedule.clone(),
                    legs: day.legs.clone(),
                    timeline,
                }
            })
            .collect();

        ItineraryView {
            days,
            unplaceable: self.unplaceable.clone(),
            excluded: self.excluded.clone(),
            mode: self.mode,
            warnings: found,
            complete: self.pending_legs() == 0,
        }
    }

    /// Stop all lookups and drop the itinerary.
    pub fn discard(self) {
        debug!("Discarding itinerary with {} pending legs", self.pending_legs());
        self.cancel.cancel();
    }
}

impl Drop for Itinerary {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
