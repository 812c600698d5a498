//! Geographic calculations

use crate::types::Coordinates;

/// Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance reported when either endpoint has no usable coordinates.
/// Large enough to rank such places behind every real candidate.
pub const MISSING_DISTANCE_KM: f64 = 99999.0;

/// Calculate Haversine distance between two points in kilometers
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine distance tolerant of missing endpoints.
///
/// Returns [`MISSING_DISTANCE_KM`] instead of failing so malformed input
/// sorts to the back of any distance ranking.
pub fn distance_km(from: Option<&Coordinates>, to: Option<&Coordinates>) -> f64 {
    match (from, to) {
        (Some(a), Some(b)) if a.is_valid() && b.is_valid() => haversine_distance(a, b),
        _ => MISSING_DISTANCE_KM,
    }
}

/// Arithmetic mean of the given coordinates, skipping invalid ones.
/// `None` if no valid coordinate is present.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Coordinates>) -> Option<Coordinates> {
    let mut count = 0usize;
    let mut lat_sum = 0.0;
    let mut lng_sum = 0.0;

    for p in points.into_iter().filter(|p| p.is_valid()) {
        lat_sum += p.lat;
        lng_sum += p.lng;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    Some(Coordinates {
        lat: lat_sum / count as f64,
        lng: lng_sum / count as f64,
    })
}
