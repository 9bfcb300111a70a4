//! Plain-text (markdown) export of a trip.

use std::fmt::Write;

use crate::models::{Activity, RouteResult, Trip};

const METERS_PER_MILE: f64 = 1609.344;

/// Render the trip as a markdown document. The totals line is only written
/// when `route` carries both distance and duration.
pub fn export_markdown(trip: &Trip, route: Option<&RouteResult>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", trip.summary);

    if let Some(totals) = route.and_then(totals_line) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{totals}");
    }

    for day in &trip.days {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Day {}: {}", day.day, day.date);
        for activity in &day.activities {
            let _ = writeln!(out);
            write_activity(&mut out, activity);
        }
    }

    out
}

fn totals_line(route: &RouteResult) -> Option<String> {
    let meters = route.distance_meters?;
    let seconds = route.duration_seconds?;
    let miles = (meters / METERS_PER_MILE).round() as i64;
    let minutes_total = (seconds / 60.0).round() as i64;
    Some(format!(
        "Total: {} miles · {}h {}m driving",
        miles,
        minutes_total / 60,
        minutes_total % 60
    ))
}

fn write_activity(out: &mut String, activity: &Activity) {
    let icon = activity.activity_type.icon();
    match &activity.place {
        Some(place) if activity.description.is_empty() => {
            let _ = writeln!(out, "{icon} **{}**", place.name);
        }
        Some(place) => {
            let _ = writeln!(out, "{icon} **{}** — {}", place.name, activity.description);
        }
        None => {
            let _ = writeln!(out, "{icon} {}", activity.description);
        }
    }

    let Some(place) = &activity.place else {
        return;
    };
    if !place.address.is_empty() {
        let _ = writeln!(out, "   {}", place.address);
    }
    if let Some(rating) = place.rating {
        let _ = writeln!(out, "   ⭐ {:.1} ({} reviews)", rating, place.rating_count);
    }
}
