//! Itinerary sync orchestration tests.
//!
//! Uses a scripted route provider with controllable delays on a paused clock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use roadtrip_core::itinerary::{MoveDirection, Mutation};
use roadtrip_core::models::{Activity, ActivityType, Coordinate, Day, Place, RouteResult, Trip};
use roadtrip_sync::{RouteClient, RouteError, RouteProvider, SyncOrchestrator};

/// Answers each call with the next scripted (delay, result) pair.
struct ScriptedProvider {
    script: Mutex<VecDeque<(Duration, Result<RouteResult, String>)>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(script: Vec<(Duration, Result<RouteResult, String>)>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteProvider for ScriptedProvider {
    async fn fetch_route(&self, points: &[Coordinate]) -> Result<RouteResult, RouteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let (delay, result) = next.unwrap_or((Duration::ZERO, Ok(routed(points, 1.0))));
        tokio::time::sleep(delay).await;
        result.map_err(|code| RouteError::Service {
            code,
            message: String::new(),
        })
    }
}

fn routed(points: &[Coordinate], distance: f64) -> RouteResult {
    RouteResult {
        geometry: points.to_vec(),
        distance_meters: Some(distance),
        duration_seconds: Some(distance / 20.0),
    }
}

fn located(id: &str, lat: f64, lng: f64) -> Activity {
    Activity::new(ActivityType::Attraction, id).with_place(Place::new(id, id, lat, lng))
}

fn two_day_trip() -> Trip {
    let mut trip = Trip::new("t1", "austin to san antonio", "Hill Country");
    let mut day1 = Day::new(1, "Austin");
    day1.activities = vec![
        located("capitol", 30.2747, -97.7404),
        Activity::new(ActivityType::Drive, "Drive south"),
    ];
    let mut day2 = Day::new(2, "San Antonio");
    day2.activities = vec![located("alamo", 29.4260, -98.4861)];
    trip.days = vec![day1, day2];
    trip
}

fn orchestrator(provider: Arc<ScriptedProvider>) -> SyncOrchestrator {
    SyncOrchestrator::new(RouteClient::new(provider, Duration::from_secs(10)))
}

#[tokio::test(start_paused = true)]
async fn load_derives_and_routes() {
    let provider = ScriptedProvider::new(vec![]);
    let mut sync = orchestrator(provider.clone());

    let outcome = sync.apply(Mutation::LoadTrip(two_day_trip())).unwrap();
    assert_eq!(outcome.stop_count, 2);
    assert_eq!(outcome.waypoint_count, 2);
    assert_eq!(outcome.route_request, Some(1));

    sync.settle().await;
    let published = sync.published();
    assert_eq!(published.seq, 1);
    assert_eq!(published.route.unwrap().geometry.len(), 2);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_older_request_never_overwrites_newer() {
    let provider = ScriptedProvider::new(vec![
        (Duration::from_millis(500), Ok(routed(&[], 111.0))),
        (Duration::from_millis(50), Ok(routed(&[], 222.0))),
    ]);
    let mut sync = orchestrator(provider.clone());
    let mut updates = sync.subscribe();

    sync.apply(Mutation::LoadTrip(two_day_trip())).unwrap();
    // Let the first request reach the provider before issuing the second.
    tokio::task::yield_now().await;
    let second = sync
        .apply(Mutation::AddActivity {
            day_index: 1,
            activity: located("riverwalk", 29.4241, -98.4936),
        })
        .unwrap();
    assert_eq!(second.route_request, Some(2));

    // The newer request lands first.
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().seq, 2);

    // The older one resolves later and is dropped.
    sync.settle().await;
    let published = sync.published();
    assert_eq!(published.seq, 2);
    assert_eq!(published.route.unwrap().distance_meters, Some(222.0));
    assert!(!updates.has_changed().unwrap());
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn superseded_request_is_dropped_even_when_it_lands_first() {
    let provider = ScriptedProvider::new(vec![
        (Duration::from_millis(10), Ok(routed(&[], 111.0))),
        (Duration::from_millis(300), Ok(routed(&[], 222.0))),
    ]);
    let mut sync = orchestrator(provider);

    sync.apply(Mutation::LoadTrip(two_day_trip())).unwrap();
    tokio::task::yield_now().await;
    sync.apply(Mutation::RemoveActivity {
        day_index: 0,
        activity_index: 1,
    })
    .unwrap();
    // Removing the drive leg does not move any waypoint.
    assert_eq!(sync.latest_seq(), 1);

    sync.apply(Mutation::AddActivity {
        day_index: 0,
        activity: located("zilker", 30.2669, -97.7729),
    })
    .unwrap();
    sync.settle().await;

    let published = sync.published();
    assert_eq!(published.seq, 2);
    assert_eq!(published.route.unwrap().distance_meters, Some(222.0));
}

#[tokio::test(start_paused = true)]
async fn description_edit_does_not_reroute() {
    let provider = ScriptedProvider::new(vec![]);
    let mut sync = orchestrator(provider.clone());
    sync.apply(Mutation::LoadTrip(two_day_trip())).unwrap();
    sync.settle().await;

    let outcome = sync
        .apply(Mutation::SetDescription {
            day_index: 0,
            activity_index: 0,
            description: "Tour the dome".to_string(),
        })
        .unwrap();
    assert_eq!(outcome.route_request, None);
    sync.settle().await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(sync.trip().days[0].activities[0].description, "Tour the dome");
}

#[tokio::test(start_paused = true)]
async fn reorder_within_day_keeps_route() {
    let provider = ScriptedProvider::new(vec![]);
    let mut sync = orchestrator(provider.clone());
    sync.apply(Mutation::LoadTrip(two_day_trip())).unwrap();

    // Same centroid after a swap.
    let swapped = sync
        .apply(Mutation::MoveActivity {
            day_index: 0,
            activity_index: 0,
            direction: MoveDirection::Later,
        })
        .unwrap();
    assert_eq!(swapped.route_request, None);
    assert_eq!(swapped.trip.days[0].activities[1].description, "capitol");

    // Past the end of the day: nothing happens at all.
    let before = Arc::clone(sync.trip());
    let noop = sync
        .apply(Mutation::MoveActivity {
            day_index: 0,
            activity_index: 1,
            direction: MoveDirection::Later,
        })
        .unwrap();
    assert!(Arc::ptr_eq(&before, &noop.trip));

    sync.settle().await;
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_below_two_waypoints_clears_route_without_request() {
    let provider = ScriptedProvider::new(vec![(
        Duration::from_millis(200),
        Ok(routed(&[], 111.0)),
    )]);
    let mut sync = orchestrator(provider.clone());

    sync.apply(Mutation::LoadTrip(two_day_trip())).unwrap();
    let outcome = sync
        .apply(Mutation::RemoveActivity {
            day_index: 1,
            activity_index: 0,
        })
        .unwrap();
    assert_eq!(outcome.waypoint_count, 1);
    assert_eq!(outcome.route_request, Some(2));
    assert_eq!(sync.published().seq, 2);
    assert!(sync.published().route.is_none());

    // The in-flight request from the load resolves later and is ignored.
    sync.settle().await;
    assert!(sync.published().route.is_none());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_route_publishes_straight_line() {
    let provider = ScriptedProvider::new(vec![(Duration::ZERO, Err("NoRoute".to_string()))]);
    let mut sync = orchestrator(provider);

    sync.apply(Mutation::LoadTrip(two_day_trip())).unwrap();
    sync.settle().await;

    let route = sync.published().route.unwrap();
    assert!(route.is_degraded());
    assert_eq!(route.geometry, sync.waypoints().iter().map(|w| w.coordinate()).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn rejected_mutation_changes_nothing() {
    let provider = ScriptedProvider::new(vec![]);
    let mut sync = orchestrator(provider.clone());
    sync.apply(Mutation::LoadTrip(two_day_trip())).unwrap();

    let before = Arc::clone(sync.trip());
    assert!(sync
        .apply(Mutation::RemoveActivity {
            day_index: 9,
            activity_index: 0,
        })
        .is_err());
    assert!(Arc::ptr_eq(&before, sync.trip()));
    assert_eq!(sync.flat_stops().len(), 2);
    assert_eq!(sync.latest_seq(), 1);
}
