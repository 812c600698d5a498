//! Trip request types (wire shapes from the trip wizard) and the validated
//! planner input built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DayWindow, Lodging, Place, PlaceCategory, TravelMode};

/// A selected place as sent by the trip wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSelection {
    pub id: String,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: PlaceCategory,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub stay_hours: Option<u32>,
    #[serde(default)]
    pub stay_minutes: Option<u32>,
}

fn default_category() -> PlaceCategory {
    PlaceCategory::Other
}

/// Lodging chosen for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LodgingSelection {
    pub day_index: usize,
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// Day window as configured in the wizard ("HH:MM" clock strings)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWindowInput {
    pub day_index: usize,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Full distribution request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    #[serde(default)]
    pub places: Vec<PlaceSelection>,
    #[serde(default)]
    pub lodgings: Vec<LodgingSelection>,
    pub days: Vec<DayWindowInput>,
    #[serde(default)]
    pub mode: TravelMode,
}

/// Validated planner input. Windows are sorted by day index and cover
/// `0..total_days()` exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct TripInput {
    pub places: Vec<Place>,
    pub lodgings: Vec<Lodging>,
    pub windows: Vec<DayWindow>,
    pub mode: TravelMode,
}

impl TripInput {
    pub fn total_days(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_request_deserializes_wizard_payload() {
        let json = r#"{
            "places": [
                {"id": "p1", "name": "Castle", "category": "tourist_attraction",
                 "lat": 34.687, "lng": 135.526, "stayHours": 1, "stayMinutes": 30},
                {"id": "p2", "name": "Ramen", "category": "restaurant"}
            ],
            "lodgings": [{"dayIndex": 0, "name": "Hotel", "lat": 34.69, "lng": 135.50}],
            "days": [{"dayIndex": 0, "date": "2025-05-01", "startTime": "10:00", "endTime": "22:00"}],
            "mode": "driving"
        }"#;

        let request: TripRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.places.len(), 2);
        assert_eq!(request.places[0].category, PlaceCategory::Sightseeing);
        assert_eq!(request.places[0].stay_hours, Some(1));
        assert_eq!(request.places[1].category, PlaceCategory::Dining);
        assert!(request.places[1].lat.is_none());
        assert_eq!(request.mode, TravelMode::Driving);
        assert_eq!(request.days[0].start_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn test_trip_request_mode_defaults_to_transit() {
        let json = r#"{"days": []}"#;
        let request: TripRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.mode, TravelMode::Transit);
        assert!(request.places.is_empty());
    }
}
