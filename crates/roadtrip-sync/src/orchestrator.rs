//! Itinerary sync orchestration.
//!
//! Every mutation re-derives the map stops and day waypoints. A route request
//! is scheduled only when the waypoint fingerprint changes. Requests carry a
//! sequence number; a result is published only if its number is still the
//! latest issued when it resolves, so a slow early request can never overwrite
//! a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use roadtrip_core::derive::{derive_flat_stops, derive_waypoints, Fingerprint};
use roadtrip_core::itinerary::{ItineraryStore, Mutation};
use roadtrip_core::models::{Coordinate, FlatStop, RouteResult, Trip, Waypoint};
use roadtrip_core::ItineraryError;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::route_client::RouteClient;

/// The route currently shown, tagged with the request that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishedRoute {
    pub seq: u64,
    pub fingerprint: Fingerprint,
    pub route: Option<RouteResult>,
}

/// What a single mutation did.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub trip: Arc<Trip>,
    pub stop_count: usize,
    pub waypoint_count: usize,
    /// Sequence number of the route request this mutation issued, if any
    pub route_request: Option<u64>,
}

pub struct SyncOrchestrator {
    store: ItineraryStore,
    client: Arc<RouteClient>,
    flat_stops: Vec<FlatStop>,
    waypoints: Vec<Waypoint>,
    /// Fingerprint of the most recently issued request
    requested: Fingerprint,
    latest_seq: Arc<AtomicU64>,
    route_tx: Arc<watch::Sender<PublishedRoute>>,
    in_flight: JoinSet<()>,
}

impl SyncOrchestrator {
    pub fn new(client: RouteClient) -> Self {
        let (route_tx, _) = watch::channel(PublishedRoute::default());
        Self {
            store: ItineraryStore::new(),
            client: Arc::new(client),
            flat_stops: Vec::new(),
            waypoints: Vec::new(),
            requested: Fingerprint::default(),
            latest_seq: Arc::new(AtomicU64::new(0)),
            route_tx: Arc::new(route_tx),
            in_flight: JoinSet::new(),
        }
    }

    /// Apply a mutation, re-derive, and schedule a route request if the
    /// waypoints moved. A rejected mutation changes nothing.
    ///
    /// Route requests are spawned, so this must run inside a Tokio runtime.
    pub fn apply(&mut self, mutation: Mutation) -> Result<SyncOutcome, ItineraryError> {
        let previous = Arc::clone(self.store.trip());
        let trip = self.store.apply(mutation)?;

        let route_request = if Arc::ptr_eq(&previous, &trip) {
            None
        } else {
            self.flat_stops = derive_flat_stops(&trip);
            self.waypoints = derive_waypoints(&trip);

            let fingerprint = Fingerprint::of(&self.waypoints);
            if fingerprint == self.requested {
                tracing::debug!("Waypoints unchanged, keeping current route");
                None
            } else {
                Some(self.schedule(fingerprint))
            }
        };

        Ok(SyncOutcome {
            trip,
            stop_count: self.flat_stops.len(),
            waypoint_count: self.waypoints.len(),
            route_request,
        })
    }

    fn schedule(&mut self, fingerprint: Fingerprint) -> u64 {
        // Reap finished tasks so the set does not grow with every edit.
        while self.in_flight.try_join_next().is_some() {}

        let seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.requested = fingerprint.clone();
        let points: Vec<Coordinate> = self.waypoints.iter().map(Waypoint::coordinate).collect();

        if points.len() < 2 {
            tracing::debug!(seq, waypoints = points.len(), "Too few waypoints to route");
            publish(
                &self.route_tx,
                &self.latest_seq,
                PublishedRoute {
                    seq,
                    fingerprint,
                    route: None,
                },
            );
            return seq;
        }

        tracing::debug!(seq, waypoints = points.len(), "Scheduling route request");
        let client = Arc::clone(&self.client);
        let latest_seq = Arc::clone(&self.latest_seq);
        let route_tx = Arc::clone(&self.route_tx);

        self.in_flight.spawn(async move {
            let route = client.compute_route(&points).await;
            let published = publish(
                &route_tx,
                &latest_seq,
                PublishedRoute {
                    seq,
                    fingerprint,
                    route,
                },
            );
            if !published {
                tracing::debug!(seq, "Discarding superseded route");
            }
        });

        seq
    }

    /// Wait for every in-flight route request to resolve.
    pub async fn settle(&mut self) {
        while let Some(result) = self.in_flight.join_next().await {
            if let Err(err) = result {
                tracing::warn!("Route task failed: {}", err);
            }
        }
    }

    pub fn trip(&self) -> &Arc<Trip> {
        self.store.trip()
    }

    pub fn flat_stops(&self) -> &[FlatStop] {
        &self.flat_stops
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Highest sequence number issued so far.
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq.load(Ordering::SeqCst)
    }

    pub fn published(&self) -> PublishedRoute {
        self.route_tx.borrow().clone()
    }

    /// Watch published routes as they land.
    pub fn subscribe(&self) -> watch::Receiver<PublishedRoute> {
        self.route_tx.subscribe()
    }
}

/// Compare-and-publish. The check and the write happen under the channel's
/// lock, so an older result can never land after a newer one.
fn publish(
    route_tx: &watch::Sender<PublishedRoute>,
    latest_seq: &AtomicU64,
    next: PublishedRoute,
) -> bool {
    route_tx.send_if_modified(|current| {
        if next.seq != latest_seq.load(Ordering::SeqCst) || next.seq <= current.seq {
            return false;
        }
        *current = next;
        true
    })
}
