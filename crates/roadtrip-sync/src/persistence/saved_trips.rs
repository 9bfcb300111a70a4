use std::sync::Arc;

use chrono::Utc;
use roadtrip_core::models::{SavedTrip, Trip};

use super::{load_or_default, load_strict, store_json, PersistenceAdapter, PersistenceError};

/// Archived trips, newest first, stored under `savedTrips`.
///
/// Lookup is by archive id. Summaries are free text and may repeat.
#[derive(Clone)]
pub struct SavedTrips {
    store: Arc<dyn PersistenceAdapter>,
}

impl SavedTrips {
    pub const KEY: &'static str = "savedTrips";

    pub fn new(store: Arc<dyn PersistenceAdapter>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<SavedTrip> {
        load_or_default(self.store.as_ref(), Self::KEY)
    }

    fn load_for_update(&self) -> Result<Vec<SavedTrip>, PersistenceError> {
        load_strict(self.store.as_ref(), Self::KEY)
    }

    /// Snapshot `trip` and put it at the front of the list. Fails without
    /// writing if the stored archive cannot be read.
    pub fn save(&self, trip: &Trip) -> Result<SavedTrip, PersistenceError> {
        let saved = SavedTrip::snapshot(trip, Utc::now());
        let mut trips = self.load_for_update()?;
        trips.insert(0, saved.clone());
        store_json(self.store.as_ref(), Self::KEY, &trips)?;
        tracing::info!(id = %saved.id, "Saved trip {}", saved.summary);
        Ok(saved)
    }

    pub fn get(&self, id: &str) -> Option<SavedTrip> {
        self.list().into_iter().find(|saved| saved.id == id)
    }

    /// Trip ready for loading into the itinerary store.
    pub fn restore(&self, id: &str) -> Option<Trip> {
        self.get(id).map(|saved| saved.to_trip())
    }

    /// Returns false when no trip has that id.
    pub fn delete(&self, id: &str) -> Result<bool, PersistenceError> {
        let mut trips = self.load_for_update()?;
        let before = trips.len();
        trips.retain(|saved| saved.id != id);
        if trips.len() == before {
            return Ok(false);
        }
        store_json(self.store.as_ref(), Self::KEY, &trips)?;
        Ok(true)
    }
}
