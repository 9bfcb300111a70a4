//! Reading trips from disk.

use std::path::Path;

use anyhow::{Context, Result};
use roadtrip_core::itinerary::validate_day_numbers;
use roadtrip_core::{PlanResponse, Trip};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum TripDocument {
    Trip(Trip),
    Plan(PlanResponse),
}

/// Load either a saved trip document or a raw `/plan` response.
pub fn load(path: &Path) -> Result<Trip> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&raw).with_context(|| format!("{} is not a trip or plan response", path.display()))
}

/// Parse a trip document and check its days are numbered 1..N.
pub fn parse(raw: &str) -> Result<Trip> {
    let document: TripDocument = serde_json::from_str(raw)?;
    let trip = match document {
        TripDocument::Trip(trip) => trip,
        TripDocument::Plan(plan) => Trip::from_plan(plan),
    };
    validate_day_numbers(&trip.days).context("trip failed validation")?;
    Ok(trip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trip_document() {
        let trip = parse(r#"{"id": "t1", "summary": "Big Bend", "days": [{"day": 1, "date": "Fri"}]}"#).unwrap();
        assert_eq!(trip.id, "t1");
        assert_eq!(trip.days.len(), 1);
    }

    #[test]
    fn parses_plan_response() {
        let trip = parse(
            r#"{"query": "big bend", "stops": [{"day": 2, "city": "Terlingua", "places": []}]}"#,
        )
        .unwrap();
        assert_eq!(trip.query, "big bend");
        assert_eq!(trip.days[0].day, 1);
    }

    #[test]
    fn rejects_gapped_day_numbers() {
        let err = parse(r#"{"id": "t1", "days": [{"day": 1}, {"day": 3}]}"#).unwrap_err();
        assert!(format!("{err:#}").contains("validation"));
    }

    #[test]
    fn rejects_other_json() {
        assert!(parse(r#"{"hello": "world"}"#).is_err());
    }
}
