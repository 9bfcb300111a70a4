//! Roadtrip core - itinerary model and route derivation
//!
//! Holds the trip document, the pure derivations the map and router consume,
//! and the decoder for the routing service's polyline format.

pub mod derive;
pub mod error;
pub mod export;
pub mod itinerary;
pub mod models;
pub mod plan;
pub mod polyline;

pub use derive::{derive_flat_stops, derive_waypoints, Fingerprint};
pub use error::{ItineraryError, PolylineError};
pub use export::export_markdown;
pub use itinerary::{ItineraryStore, MoveDirection, Mutation};
pub use models::{
    Activity, ActivityType, Coordinate, Day, FavoriteSet, FlatStop, Place, Review, RouteResult,
    SavedTrip, Trip, Waypoint,
};
pub use plan::{DayStop, PlanResponse, PlaceSummary};
