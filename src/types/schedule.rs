//! Schedule output types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Lodging, Place};

/// A place placed on a day, with its position in the day's route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitLeg {
    pub place: Place,
    pub arrival_order_index: usize,
}

/// Ordered visits of one trip day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub day_index: usize,
    pub date: NaiveDate,
    pub visits: Vec<VisitLeg>,
    pub lodging: Option<Lodging>,
    pub available_minutes: u32,
}

impl DaySchedule {
    pub fn total_stay_minutes(&self) -> u32 {
        self.visits
            .iter()
            .fold(0u32, |total, v| total.saturating_add(v.place.stay_minutes))
    }

    /// Re-number `arrival_order_index` after the visit list changed.
    pub fn renumber(&mut self) {
        for (i, visit) in self.visits.iter_mut().enumerate() {
            visit.arrival_order_index = i;
        }
    }
}

/// Output of one distribution run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResult {
    pub days: Vec<DaySchedule>,
    /// Places that fit into no day after overflow reassignment
    pub unplaceable: Vec<String>,
    /// Places never distributed (lodgings selected as places)
    pub excluded: Vec<String>,
}

impl DistributionResult {
    pub fn assigned_count(&self) -> usize {
        self.days.iter().map(|d| d.visits.len()).sum()
    }
}
