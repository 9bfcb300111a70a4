use std::sync::Arc;

use roadtrip_core::models::FavoriteSet;

use super::{load_or_default, load_strict, store_json, PersistenceAdapter, PersistenceError};

/// Favorited place ids, stored under `favorites` as a JSON array.
#[derive(Clone)]
pub struct Favorites {
    store: Arc<dyn PersistenceAdapter>,
}

impl Favorites {
    pub const KEY: &'static str = "favorites";

    pub fn new(store: Arc<dyn PersistenceAdapter>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> FavoriteSet {
        load_or_default(self.store.as_ref(), Self::KEY)
    }

    pub fn contains(&self, place_id: &str) -> bool {
        self.load().contains(place_id)
    }

    /// Flip a place in or out of favorites; returns true if it is now a favorite.
    ///
    /// Fails without writing if the stored set cannot be read.
    pub fn toggle(&self, place_id: &str) -> Result<bool, PersistenceError> {
        let mut favorites: FavoriteSet = load_strict(self.store.as_ref(), Self::KEY)?;
        let added = favorites.toggle(place_id);
        store_json(self.store.as_ref(), Self::KEY, &favorites)?;
        Ok(added)
    }
}
