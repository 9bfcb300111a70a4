//! Pure projections of a trip snapshot: map stops, route waypoints and the
//! waypoint fingerprint used to decide whether a new route is needed.

use crate::models::{FlatStop, Trip, Waypoint};

/// Rounding applied before fingerprinting (1e-5 degrees, about 1 m).
pub const FINGERPRINT_SCALE: f64 = 1e5;

/// One stop per activity that carries a place, in day then activity order.
pub fn derive_flat_stops(trip: &Trip) -> Vec<FlatStop> {
    trip.days
        .iter()
        .flat_map(|day| {
            day.activities.iter().filter_map(move |activity| {
                activity.place.as_ref().map(|place| FlatStop {
                    place: place.clone(),
                    day: day.day,
                    activity_type: activity.activity_type,
                })
            })
        })
        .collect()
}

/// One centroid per day that has at least one located place, in day order.
pub fn derive_waypoints(trip: &Trip) -> Vec<Waypoint> {
    let mut waypoints = Vec::with_capacity(trip.days.len());

    for day in &trip.days {
        let mut count = 0usize;
        let mut lat_sum = 0.0;
        let mut lng_sum = 0.0;

        for place in day
            .activities
            .iter()
            .filter_map(|activity| activity.place.as_ref())
            .filter(|place| place.is_located())
        {
            count += 1;
            lat_sum += place.lat;
            lng_sum += place.lng;
        }

        if count > 0 {
            waypoints.push(Waypoint {
                day: day.day,
                lat: lat_sum / count as f64,
                lng: lng_sum / count as f64,
            });
        }
    }

    waypoints
}

/// Order-sensitive digest of a waypoint list, rounded to absorb float jitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fingerprint(Vec<(i64, i64)>);

impl Fingerprint {
    pub fn of(waypoints: &[Waypoint]) -> Self {
        Self(
            waypoints
                .iter()
                .map(|wp| (quantize(wp.lat), quantize(wp.lng)))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn quantize(degrees: f64) -> i64 {
    (degrees * FINGERPRINT_SCALE).round() as i64
}
