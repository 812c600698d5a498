//! Seed-based geographic clustering

use crate::services::geo::{centroid, distance_km};
use crate::types::{Coordinates, Place};

/// Maximum distance from a cluster's seed for a place to join it
pub const CLUSTER_DISTANCE_THRESHOLD_KM: f64 = 5.0;

/// Group of nearby places that should land on the same day
#[derive(Debug, Clone)]
pub struct Cluster<'a> {
    /// Seed first, then absorbed places in selection order
    pub members: Vec<&'a Place>,
    pub centroid: Option<Coordinates>,
}

impl<'a> Cluster<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Single pass over the places in selection order. Each unassigned place
/// seeds a cluster and absorbs every unassigned place within the threshold
/// of the seed. Distances are measured from the seed only, so members of one
/// cluster may be further apart than the threshold.
///
/// Places without coordinates are never within range of anything and end up
/// as singletons.
pub fn cluster_places<'a>(places: &[&'a Place]) -> Vec<Cluster<'a>> {
    let mut taken = vec![false; places.len()];
    let mut clusters = Vec::new();

    for (i, seed) in places.iter().enumerate() {
        if taken[i] {
            continue;
        }
        taken[i] = true;

        let mut members = vec![*seed];
        for (j, other) in places.iter().enumerate().skip(i + 1) {
            if taken[j] {
                continue;
            }
            let d = distance_km(seed.coordinates.as_ref(), other.coordinates.as_ref());
            if d <= CLUSTER_DISTANCE_THRESHOLD_KM {
                taken[j] = true;
                members.push(*other);
            }
        }

        let center = centroid(members.iter().filter_map(|p| p.coordinates.as_ref()));
        clusters.push(Cluster {
            members,
            centroid: center,
        });
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaceCategory;

    fn place(id: &str, lat: f64, lng: f64) -> Place {
        Place::new(id, id, PlaceCategory::Sightseeing, Some(Coordinates::new(lat, lng)), 60)
    }

    fn ids<'a>(cluster: &Cluster<'a>) -> Vec<&'a str> {
        cluster.members.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_nearby_places_share_cluster() {
        // Dotonbori area, all within ~2 km
        let a = place("a", 34.6687, 135.5013);
        let b = place("b", 34.6730, 135.5010);
        let c = place("c", 34.6650, 135.5060);
        let places = vec![&a, &b, &c];

        let clusters = cluster_places(&places);

        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), vec!["a", "b", "c"]);
        assert!(clusters[0].centroid.is_some());
    }

    #[test]
    fn test_distant_places_are_singletons() {
        let osaka = place("osaka", 34.6937, 135.5023);
        let kyoto = place("kyoto", 35.0116, 135.7681);
        let nara = place("nara", 34.6851, 135.8048);
        let places = vec![&osaka, &kyoto, &nara];

        let clusters = cluster_places(&places);

        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_distance_measured_from_seed_only() {
        // b is ~4.4 km east of a, c ~4.4 km east of b (~8.8 km from a)
        let a = place("a", 34.70, 135.40);
        let b = place("b", 34.70, 135.448);
        let c = place("c", 34.70, 135.496);
        let places = vec![&a, &b, &c];

        let clusters = cluster_places(&places);

        assert_eq!(clusters.len(), 2);
        assert_eq!(ids(&clusters[0]), vec!["a", "b"]);
        assert_eq!(ids(&clusters[1]), vec!["c"]);
    }

    #[test]
    fn test_centroid_is_member_mean() {
        let a = place("a", 34.0, 135.0);
        let b = place("b", 34.02, 135.02);
        let places = vec![&a, &b];

        let clusters = cluster_places(&places);
        let center = clusters[0].centroid.unwrap();

        assert!((center.lat - 34.01).abs() < 1e-9);
        assert!((center.lng - 135.01).abs() < 1e-9);
    }

    #[test]
    fn test_missing_coordinates_form_singletons() {
        let a = Place::new("a", "a", PlaceCategory::Other, None, 60);
        let b = Place::new("b", "b", PlaceCategory::Other, None, 60);
        let places = vec![&a, &b];

        let clusters = cluster_places(&places);

        assert_eq!(clusters.len(), 2);
        assert!(clusters[0].centroid.is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_places(&[]).is_empty());
    }
}
