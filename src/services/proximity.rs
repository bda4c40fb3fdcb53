//! Great-circle distances between locations and the "vehicle near cargo"
//! matching rule built on top of them.

use serde::Serialize;
use std::sync::Arc;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.7613;

/// A vehicle counts as near a cargo when its distance to the pick-up
/// location is at most this many miles.
pub const NEARBY_THRESHOLD_MILES: f64 = 455.0;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Strategy for measuring the distance in miles between two points.
pub trait DistanceMetric: Send + Sync {
    fn miles_between(&self, from: Coordinates, to: Coordinates) -> f64;
}

/// Haversine distance over a spherical Earth.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl DistanceMetric for GreatCircle {
    fn miles_between(&self, from: Coordinates, to: Coordinates) -> f64 {
        let lat1 = from.latitude.to_radians();
        let lat2 = to.latitude.to_radians();
        let dlat = (to.latitude - from.latitude).to_radians();
        let dlon = (to.longitude - from.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        // rounding can push antipodal points just past 1.0
        let a = a.clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_MILES * c
    }
}

/// A candidate paired with its distance from the reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct Measured<T> {
    pub item: T,
    pub distance_miles: f64,
}

/// Applies a [`DistanceMetric`] and the nearby threshold to sets of
/// positioned items.
#[derive(Clone)]
pub struct ProximityMatcher {
    metric: Arc<dyn DistanceMetric>,
    threshold_miles: f64,
}

impl Default for ProximityMatcher {
    fn default() -> Self {
        Self::new(GreatCircle)
    }
}

impl ProximityMatcher {
    pub fn new(metric: impl DistanceMetric + 'static) -> Self {
        Self {
            metric: Arc::new(metric),
            threshold_miles: NEARBY_THRESHOLD_MILES,
        }
    }

    pub fn threshold_miles(&self) -> f64 {
        self.threshold_miles
    }

    pub fn distance(&self, from: Coordinates, to: Coordinates) -> f64 {
        self.metric.miles_between(from, to)
    }

    pub fn is_nearby(&self, from: Coordinates, to: Coordinates) -> bool {
        self.distance(from, to) <= self.threshold_miles
    }

    /// Number of positions within the threshold of `origin`.
    pub fn count_nearby<I>(&self, origin: Coordinates, positions: I) -> usize
    where
        I: IntoIterator<Item = Coordinates>,
    {
        positions
            .into_iter()
            .filter(|position| self.is_nearby(origin, *position))
            .count()
    }

    /// Pairs every item with its distance from `origin`, preserving input order.
    pub fn annotate<T, I, F>(&self, origin: Coordinates, items: I, position_of: F) -> Vec<Measured<T>>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Coordinates,
    {
        items
            .into_iter()
            .map(|item| {
                let distance_miles = self.distance(origin, position_of(&item));
                Measured {
                    item,
                    distance_miles,
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for ProximityMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityMatcher")
            .field("threshold_miles", &self.threshold_miles)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOS_ANGELES: Coordinates = Coordinates {
        latitude: 34.0522,
        longitude: -118.2437,
    };
    const SAN_FRANCISCO: Coordinates = Coordinates {
        latitude: 37.7749,
        longitude: -122.4194,
    };
    const NEW_YORK: Coordinates = Coordinates {
        latitude: 40.7128,
        longitude: -74.0060,
    };

    struct FixedMetric(f64);

    impl DistanceMetric for FixedMetric {
        fn miles_between(&self, _from: Coordinates, _to: Coordinates) -> f64 {
            self.0
        }
    }

    #[test]
    fn identical_points_are_zero_miles_apart() {
        assert_eq!(GreatCircle.miles_between(NEW_YORK, NEW_YORK), 0.0);
    }

    #[test]
    fn los_angeles_to_san_francisco() {
        let miles = GreatCircle.miles_between(LOS_ANGELES, SAN_FRANCISCO);
        assert!((miles - 347.4).abs() < 1.0, "got {miles}");
    }

    #[test]
    fn distance_is_symmetric() {
        let there = GreatCircle.miles_between(LOS_ANGELES, NEW_YORK);
        let back = GreatCircle.miles_between(NEW_YORK, LOS_ANGELES);
        assert!((there - back).abs() < 1e-9);
        assert!((there - 2445.0).abs() < 10.0, "got {there}");
    }

    #[test]
    fn threshold_is_inclusive() {
        let matcher = ProximityMatcher::new(FixedMetric(NEARBY_THRESHOLD_MILES));
        assert!(matcher.is_nearby(LOS_ANGELES, NEW_YORK));

        let matcher = ProximityMatcher::new(FixedMetric(NEARBY_THRESHOLD_MILES + 0.001));
        assert!(!matcher.is_nearby(LOS_ANGELES, NEW_YORK));
    }

    #[test]
    fn counts_only_positions_within_threshold() {
        let matcher = ProximityMatcher::default();
        let count = matcher.count_nearby(LOS_ANGELES, [LOS_ANGELES, SAN_FRANCISCO, NEW_YORK]);
        assert_eq!(count, 2);
        assert_eq!(matcher.count_nearby(LOS_ANGELES, Vec::new()), 0);
    }

    #[test]
    fn annotate_preserves_order() {
        let matcher = ProximityMatcher::default();
        let measured = matcher.annotate(LOS_ANGELES, vec![NEW_YORK, LOS_ANGELES], |c| *c);
        assert_eq!(measured.len(), 2);
        assert_eq!(measured[0].item, NEW_YORK);
        assert!(measured[0].distance_miles > 2000.0);
        assert_eq!(measured[1].distance_miles, 0.0);
    }
}
