//! Roadtrip CLI - drive the itinerary engine from the command line.

mod trip_file;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use roadtrip_core::itinerary::Mutation;
use roadtrip_core::{export_markdown, polyline, RouteResult, Trip};
use roadtrip_sync::{Config, Favorites, FileStore, PersistenceAdapter, RouteClient, SavedTrips, SyncOrchestrator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Routing service base URL (overrides ROUTING_URL)
    #[arg(long, global = true)]
    routing_url: Option<String>,

    /// Directory for favorites and saved trips (overrides ROADTRIP_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode an encoded polyline into lat,lng lines
    Decode {
        polyline: String,
        #[arg(long, default_value_t = polyline::DEFAULT_PRECISION)]
        precision: u32,
    },
    /// Load a trip (or /plan response) and compute its driving route
    Route { trip: PathBuf },
    /// Print a trip as markdown, with route totals when available
    Export {
        trip: PathBuf,
        /// Skip the routing service
        #[arg(long)]
        offline: bool,
    },
    /// Archive a trip
    Save { trip: PathBuf },
    /// Work with archived trips
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Toggle a place in or out of favorites
    Favorite { place_id: String },
    /// List favorite place ids
    Favorites,
}

#[derive(Subcommand, Debug)]
enum SavedAction {
    List,
    Show { id: String },
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("roadtrip=info".parse()?))
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(url) = args.routing_url {
        config.routing_url = url;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    let store: Arc<dyn PersistenceAdapter> = Arc::new(FileStore::new(config.data_dir.clone()));

    match args.command {
        Command::Decode { polyline: encoded, precision } => {
            let points = polyline::decode_with_precision(&encoded, precision)
                .context("failed to decode polyline")?;
            for point in points {
                println!("{:.6},{:.6}", point.lat, point.lng);
            }
        }
        Command::Route { trip } => {
            let trip = trip_file::load(&trip)?;
            let (sync, route) = route_trip(&config, trip).await?;

            println!("{}", sync.trip().summary);
            for stop in sync.flat_stops() {
                println!("  day {} {:?}: {}", stop.day, stop.activity_type, stop.place.name);
            }
            for waypoint in sync.waypoints() {
                println!("  waypoint day {}: {:.5},{:.5}", waypoint.day, waypoint.lat, waypoint.lng);
            }
            print_route(route.as_ref());
        }
        Command::Export { trip, offline } => {
            let trip = trip_file::load(&trip)?;
            let route = if offline {
                None
            } else {
                route_trip(&config, trip.clone()).await?.1
            };
            print!("{}", export_markdown(&trip, route.as_ref()));
        }
        Command::Save { trip } => {
            let trip = trip_file::load(&trip)?;
            let saved = SavedTrips::new(store).save(&trip)?;
            println!("{}", saved.id);
        }
        Command::Saved { action } => {
            let saved_trips = SavedTrips::new(store);
            match action {
                SavedAction::List => {
                    for saved in saved_trips.list() {
                        println!(
                            "{}  {}  {} ({} days)",
                            saved.id,
                            saved.saved_at.format("%Y-%m-%d %H:%M"),
                            saved.summary,
                            saved.days.len()
                        );
                    }
                }
                SavedAction::Show { id } => {
                    let Some(trip) = saved_trips.restore(&id) else {
                        bail!("no saved trip with id {id}");
                    };
                    print!("{}", export_markdown(&trip, None));
                }
                SavedAction::Delete { id } => {
                    if !saved_trips.delete(&id)? {
                        bail!("no saved trip with id {id}");
                    }
                    println!("Deleted {id}");
                }
            }
        }
        Command::Favorite { place_id } => {
            let added = Favorites::new(store).toggle(&place_id)?;
            println!("{} {}", if added { "Added" } else { "Removed" }, place_id);
        }
        Command::Favorites => {
            for place_id in Favorites::new(store).load().iter() {
                println!("{place_id}");
            }
        }
    }

    Ok(())
}

async fn route_trip(config: &Config, trip: Trip) -> Result<(SyncOrchestrator, Option<RouteResult>)> {
    let mut sync = SyncOrchestrator::new(RouteClient::osrm(config));
    sync.apply(Mutation::LoadTrip(trip))
        .context("trip failed validation")?;
    sync.settle().await;
    let route = sync.published().route;
    Ok((sync, route))
}

fn print_route(route: Option<&RouteResult>) {
    let Some(route) = route else {
        println!("No route (fewer than two located days)");
        return;
    };
    match (route.distance_meters, route.duration_seconds) {
        (Some(meters), Some(seconds)) => println!(
            "Route: {:.1} km, {:.0} min, {} points",
            meters / 1000.0,
            seconds / 60.0,
            route.geometry.len()
        ),
        _ => println!(
            "Route unavailable, straight line through {} waypoints",
            route.geometry.len()
        ),
    }
}
