//! Travel mode and leg estimate types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Driving,
    #[default]
    Transit,
}

impl TravelMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Transit => "transit",
        }
    }
}

impl std::str::FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "drive" => Ok(TravelMode::Driving),
            "transit" => Ok(TravelMode::Transit),
            other => Err(format!("unknown travel mode '{}'", other)),
        }
    }
}

/// Duration/distance of one travel leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelEstimate {
    pub duration_minutes: u32,
    pub distance_km: f64,
    /// True when the value comes from the straight-line fallback instead of
    /// the routing service
    pub is_estimated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_mode_from_str() {
        assert_eq!("driving".parse::<TravelMode>().unwrap(), TravelMode::Driving);
        assert_eq!("DRIVE".parse::<TravelMode>().unwrap(), TravelMode::Driving);
        assert_eq!("transit".parse::<TravelMode>().unwrap(), TravelMode::Transit);
        assert!("walking".parse::<TravelMode>().is_err());
    }

    #[test]
    fn test_travel_mode_serde() {
        assert_eq!(serde_json::to_string(&TravelMode::Driving).unwrap(), "\"driving\"");
        let mode: TravelMode = serde_json::from_str("\"transit\"").unwrap();
        assert_eq!(mode, TravelMode::Transit);
    }
}
