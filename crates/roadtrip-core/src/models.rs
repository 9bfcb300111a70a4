//! Core data models for the trip itinerary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of stop an activity represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Drive,
    Food,
    Attraction,
    #[default]
    Activity,
    Hotel,
}

impl ActivityType {
    /// Icon used by the plain-text export.
    pub fn icon(self) -> &'static str {
        match self {
            ActivityType::Drive => "🚗",
            ActivityType::Food => "🍽️",
            ActivityType::Attraction => "🏛️",
            ActivityType::Activity => "🎯",
            ActivityType::Hotel => "🏨",
        }
    }
}

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A review attached to a place by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: String,
}

/// A place returned by the search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(with = "degrees_or_null")]
    pub lat: f64,
    #[serde(with = "degrees_or_null")]
    pub lng: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub category: String,
    /// 1 (cheap) through 4 (expensive)
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Why the planner recommended this place
    #[serde(default)]
    pub why: Option<String>,
    // Lazily fetched detail fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
}

impl Place {
    /// Minimal place with only the fields the engine needs.
    pub fn new(place_id: impl Into<String>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            address: String::new(),
            lat,
            lng,
            rating: None,
            rating_count: 0,
            category: String::new(),
            price_level: None,
            photo_url: None,
            why: None,
            phone: None,
            website: None,
            reviews: Vec::new(),
        }
    }

    /// True when the coordinates are finite and within WGS84 bounds.
    pub fn is_located(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Unlocated places carry non-finite coordinates. JSON has no NaN, so they
/// are written as `null` and read back as NaN.
mod degrees_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub place: Option<Place>,
}

impl Activity {
    pub fn new(activity_type: ActivityType, description: impl Into<String>) -> Self {
        Self {
            activity_type,
            description: description.into(),
            place: None,
        }
    }

    pub fn with_place(mut self, place: Place) -> Self {
        self.place = Some(place);
        self
    }
}

/// One day of the itinerary. Activity order is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// 1-based day number
    pub day: u32,
    /// Display label, e.g. a date or the day's cities
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Day {
    pub fn new(day: u32, date: impl Into<String>) -> Self {
        Self {
            day,
            date: date.into(),
            activities: Vec::new(),
        }
    }
}

/// A multi-day trip. Identity is `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Trip {
    pub fn new(id: impl Into<String>, query: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            summary: summary.into(),
            days: Vec::new(),
        }
    }

    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }
}

/// Map-facing projection of a located activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatStop {
    pub place: Place,
    pub day: u32,
    pub activity_type: ActivityType,
}

/// Day-level centroid used to query the router.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub day: u32,
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// A driving route across the itinerary.
///
/// Distance and duration are present only when the routing service answered;
/// a degraded result carries the straight-line geometry alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub geometry: Vec<Coordinate>,
    pub distance_meters: Option<f64>,
    pub duration_seconds: Option<f64>,
}

impl RouteResult {
    /// Fallback connecting the waypoints directly, in order.
    pub fn straight_line(points: &[Coordinate]) -> Self {
        Self {
            geometry: points.to_vec(),
            distance_meters: None,
            duration_seconds: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.distance_meters.is_none() || self.duration_seconds.is_none()
    }
}

/// Favorited place ids, independent of any single trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<String>);

impl FavoriteSet {
    pub fn contains(&self, place_id: &str) -> bool {
        self.0.contains(place_id)
    }

    /// Flip membership; returns true if the place is now a favorite.
    pub fn toggle(&mut self, place_id: &str) -> bool {
        if self.0.remove(place_id) {
            false
        } else {
            self.0.insert(place_id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Archived copy of a trip. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTrip {
    pub id: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub days: Vec<Day>,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

impl SavedTrip {
    /// Snapshot a trip under a fresh archive id.
    pub fn snapshot(trip: &Trip, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            query: trip.query.clone(),
            summary: trip.summary.clone(),
            days: trip.days.clone(),
            saved_at,
        }
    }

    /// Rebuild a loadable trip from the archive.
    pub fn to_trip(&self) -> Trip {
        Trip {
            id: self.id.clone(),
            query: self.query.clone(),
            summary: self.summary.clone(),
            days: self.days.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_type_serializes_lowercase() {
        let json = serde_json::to_string(&ActivityType::Attraction).unwrap();
        assert_eq!(json, "\"attraction\"");
    }

    #[test]
    fn activity_parses_without_place() {
        let activity: Activity =
            serde_json::from_str(r#"{"type":"drive","description":"Head west"}"#).unwrap();
        assert_eq!(activity.activity_type, ActivityType::Drive);
        assert!(activity.place.is_none());
    }

    #[test]
    fn place_outside_wgs84_is_not_located() {
        assert!(Place::new("a", "A", 30.0, -97.0).is_located());
        assert!(!Place::new("b", "B", f64::NAN, -97.0).is_located());
        assert!(!Place::new("c", "C", 91.0, 0.0).is_located());
    }

    #[test]
    fn unlocated_place_round_trips_through_json() {
        let place = Place::new("u", "Somewhere", f64::NAN, f64::INFINITY);
        let json = serde_json::to_value(&place).unwrap();
        assert!(json["lat"].is_null());
        assert!(json["lng"].is_null());

        let back: Place = serde_json::from_value(json).unwrap();
        assert!(back.lat.is_nan());
        assert!(back.lng.is_nan());
        assert!(!back.is_located());

        let located: Place =
            serde_json::from_str(r#"{"place_id":"a","name":"A","lat":30.5,"lng":-97.25}"#).unwrap();
        assert_eq!(located.coordinate(), Coordinate::new(30.5, -97.25));
    }

    #[test]
    fn favorites_toggle_and_serialize_as_array() {
        let mut favorites = FavoriteSet::default();
        assert!(favorites.toggle("p1"));
        assert!(favorites.toggle("p2"));
        assert!(!favorites.toggle("p1"));
        assert_eq!(serde_json::to_string(&favorites).unwrap(), r#"["p2"]"#);
    }

    #[test]
    fn saved_trip_uses_saved_at_key() {
        let trip = Trip::new("t1", "bbq in texas", "Texas BBQ");
        let saved = SavedTrip::snapshot(&trip, Utc::now());
        let value = serde_json::to_value(&saved).unwrap();
        assert!(value.get("savedAt").is_some());
        assert_ne!(saved.id, trip.id);
        assert_eq!(saved.to_trip().summary, "Texas BBQ");
    }
}
