//! Roadtrip sync - keeps derived stops and the driving route in step with
//! itinerary edits.
//!
//! Talks to the external routing service and the key-value persistence layer.

pub mod config;
pub mod orchestrator;
pub mod persistence;
pub mod route_client;

pub use config::Config;
pub use orchestrator::{PublishedRoute, SyncOrchestrator, SyncOutcome};
pub use persistence::{Favorites, FileStore, MemoryStore, PersistenceAdapter, PersistenceError, SavedTrips};
pub use route_client::{OsrmProvider, RouteClient, RouteError, RouteProvider};
