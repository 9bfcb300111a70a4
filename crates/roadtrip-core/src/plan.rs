//! Conversion of the planning backend's `/plan` response into a trip.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Activity, ActivityType, Day, Place, Trip};

/// Place as returned by the search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub why: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStop {
    pub day: u32,
    pub city: String,
    #[serde(default)]
    pub places: Vec<PlaceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub query: String,
    #[serde(default)]
    pub stops: Vec<DayStop>,
}

impl From<PlaceSummary> for Place {
    fn from(summary: PlaceSummary) -> Self {
        let mut place = Place::new(summary.place_id, summary.name, summary.lat, summary.lng);
        place.address = summary.address;
        place.rating = summary.rating;
        place.rating_count = summary.rating_count;
        place.category = summary.category;
        place.why = summary.why;
        place
    }
}

/// Guess the activity type from a search category such as `barbecue_restaurant`.
pub fn activity_type_for_category(category: &str) -> ActivityType {
    const FOOD: &[&str] = &["restaurant", "cafe", "coffee", "bar", "bakery", "food", "brewery", "winery"];
    const HOTEL: &[&str] = &["lodging", "hotel", "motel", "inn", "campground", "rv_park"];
    const ATTRACTION: &[&str] = &[
        "museum",
        "park",
        "landmark",
        "tourist_attraction",
        "historical",
        "monument",
        "zoo",
        "aquarium",
        "church",
    ];

    // Keys match whole `_`-separated words, so `parking` is not a park.
    let padded: String = format!("_{category}_")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let matches = |keys: &[&str]| keys.iter().any(|key| padded.contains(&format!("_{key}_")));

    if matches(HOTEL) {
        ActivityType::Hotel
    } else if matches(FOOD) {
        ActivityType::Food
    } else if matches(ATTRACTION) {
        ActivityType::Attraction
    } else {
        ActivityType::Activity
    }
}

impl Trip {
    /// Build a trip from a planning response.
    ///
    /// Stops sharing a day number are merged, and days are renumbered 1..N in
    /// ascending order of the backend's day numbers.
    pub fn from_plan(response: PlanResponse) -> Trip {
        let mut by_day: BTreeMap<u32, Vec<DayStop>> = BTreeMap::new();
        for stop in response.stops {
            by_day.entry(stop.day).or_default().push(stop);
        }

        let mut route_cities: Vec<String> = Vec::new();
        let mut days = Vec::with_capacity(by_day.len());

        for (idx, stops) in by_day.into_values().enumerate() {
            let mut cities: Vec<String> = Vec::new();
            let mut activities = Vec::new();

            for stop in stops {
                if !stop.city.is_empty() && !cities.contains(&stop.city) {
                    cities.push(stop.city.clone());
                }
                for summary in stop.places {
                    let activity_type = activity_type_for_category(&summary.category);
                    let description = summary
                        .why
                        .clone()
                        .filter(|why| !why.trim().is_empty())
                        .unwrap_or_else(|| summary.category.replace('_', " "));
                    activities.push(Activity::new(activity_type, description).with_place(summary.into()));
                }
            }

            for city in &cities {
                if !route_cities.contains(city) {
                    route_cities.push(city.clone());
                }
            }

            days.push(Day {
                day: idx as u32 + 1,
                date: cities.join(" / "),
                activities,
            });
        }

        let summary = if route_cities.is_empty() {
            format!("{}-day trip", days.len())
        } else {
            format!("{}-day trip: {}", days.len(), route_cities.join(" → "))
        };

        Trip {
            id: uuid::Uuid::new_v4().to_string(),
            query: response.query,
            summary,
            days,
        }
    }
}
