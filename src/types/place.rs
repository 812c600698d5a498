//! Place and lodging types

use serde::{Deserialize, Deserializer, Serialize};

/// Geographic coordinates (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build coordinates from optional parts, treating absent or non-finite
    /// values as missing.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(Self { lat, lng }),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Place category as used by the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    Sightseeing,
    Cafe,
    Dining,
    /// Lodgings selected as places are never distributed
    Lodging,
    Other,
}

impl PlaceCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            PlaceCategory::Sightseeing => "sightseeing",
            PlaceCategory::Cafe => "cafe",
            PlaceCategory::Dining => "dining",
            PlaceCategory::Lodging => "lodging",
            PlaceCategory::Other => "other",
        }
    }

    /// Map an upstream category label (our own names or place-type tags from
    /// the search provider) to a category. Unknown labels map to `Other`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "sightseeing" | "attraction" | "tourist_attraction" | "museum" | "landmark" => {
                PlaceCategory::Sightseeing
            }
            "cafe" | "coffee" | "bakery" => PlaceCategory::Cafe,
            "dining" | "restaurant" | "food" | "meal_takeaway" => PlaceCategory::Dining,
            "lodging" | "accommodation" | "hotel" => PlaceCategory::Lodging,
            _ => PlaceCategory::Other,
        }
    }

    /// Dining and cafe stops count as food stops for the adjacency rule.
    pub fn is_food(self) -> bool {
        matches!(self, PlaceCategory::Dining | PlaceCategory::Cafe)
    }
}

impl<'de> Deserialize<'de> for PlaceCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(PlaceCategory::parse(&label))
    }
}

/// A candidate point of interest selected by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub category: PlaceCategory,
    pub coordinates: Option<Coordinates>,
    /// Expected stay in minutes
    pub stay_minutes: u32,
}

impl Place {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: PlaceCategory,
        coordinates: Option<Coordinates>,
        stay_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            coordinates,
            stay_minutes,
        }
    }
}

/// Accommodation bound to a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lodging {
    pub day_index: usize,
    pub name: String,
    pub coordinates: Option<Coordinates>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_known_labels() {
        assert_eq!(PlaceCategory::parse("restaurant"), PlaceCategory::Dining);
        assert_eq!(PlaceCategory::parse("Dining"), PlaceCategory::Dining);
        assert_eq!(PlaceCategory::parse("cafe"), PlaceCategory::Cafe);
        assert_eq!(PlaceCategory::parse("tourist_attraction"), PlaceCategory::Sightseeing);
        assert_eq!(PlaceCategory::parse(" hotel "), PlaceCategory::Lodging);
    }

    #[test]
    fn test_category_parse_unknown_is_other() {
        assert_eq!(PlaceCategory::parse("shopping_mall"), PlaceCategory::Other);
        assert_eq!(PlaceCategory::parse(""), PlaceCategory::Other);
    }

    #[test]
    fn test_category_is_food() {
        assert!(PlaceCategory::Dining.is_food());
        assert!(PlaceCategory::Cafe.is_food());
        assert!(!PlaceCategory::Sightseeing.is_food());
        assert!(!PlaceCategory::Other.is_food());
    }

    #[test]
    fn test_category_deserializes_from_label() {
        let cat: PlaceCategory = serde_json::from_str("\"restaurant\"").unwrap();
        assert_eq!(cat, PlaceCategory::Dining);
        assert_eq!(serde_json::to_string(&cat).unwrap(), "\"dining\"");
    }

    #[test]
    fn test_coordinates_from_parts() {
        assert!(Coordinates::from_parts(Some(34.6), Some(135.5)).is_some());
        assert!(Coordinates::from_parts(None, Some(135.5)).is_none());
        assert!(Coordinates::from_parts(Some(f64::NAN), Some(135.5)).is_none());
    }
}
