//! Driving routes from an OSRM-compatible routing service.
//!
//! `RouteProvider` is the raw service call and may fail. `RouteClient` wraps a
//! provider and never fails: anything that goes wrong degrades to a straight
//! line through the waypoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use roadtrip_core::models::{Coordinate, RouteResult};
use roadtrip_core::polyline;
use roadtrip_core::PolylineError;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing service returned HTTP {0}")]
    Status(u16),

    #[error("routing response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("routing service answered {code}: {message}")]
    Service { code: String, message: String },

    #[error("routing service returned no routes")]
    NoRoutes,

    #[error("route geometry is malformed: {0}")]
    Geometry(#[from] PolylineError),

    #[error("routing request timed out after {0:?}")]
    Timeout(Duration),
}

/// A source of driving routes through an ordered list of coordinates.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn fetch_route(&self, points: &[Coordinate]) -> Result<RouteResult, RouteError>;
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: String,
}

/// HTTP provider for the OSRM `/route/v1` API.
pub struct OsrmProvider {
    client: Client,
    base_url: String,
    profile: String,
    timeout: Duration,
}

impl OsrmProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.routing_url.trim_end_matches('/').to_string(),
            profile: config.routing_profile.clone(),
            timeout: config.routing_timeout(),
        }
    }

    /// `{base}/route/v1/{profile}/{lng,lat;...}` with full polyline geometry.
    pub fn route_url(&self, points: &[Coordinate]) -> String {
        let path = points
            .iter()
            .map(|p| format!("{:.6},{:.6}", p.lng, p.lat))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline",
            self.base_url, self.profile, path
        )
    }
}

#[async_trait]
impl RouteProvider for OsrmProvider {
    async fn fetch_route(&self, points: &[Coordinate]) -> Result<RouteResult, RouteError> {
        let url = self.route_url(points);
        tracing::debug!(points = points.len(), "Requesting route");

        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // OSRM reports NoRoute and friends as a 4xx with a JSON body.
        let parsed: OsrmResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(RouteError::Status(status.as_u16())),
            Err(err) => return Err(err.into()),
        };
        parse_route(parsed)
    }
}

fn parse_route(response: OsrmResponse) -> Result<RouteResult, RouteError> {
    if response.code != "Ok" {
        return Err(RouteError::Service {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let route = response.routes.into_iter().next().ok_or(RouteError::NoRoutes)?;
    let geometry = polyline::decode(&route.geometry)?;

    Ok(RouteResult {
        geometry,
        distance_meters: Some(route.distance),
        duration_seconds: Some(route.duration),
    })
}

/// Best-effort route computation with a straight-line fallback.
#[derive(Clone)]
pub struct RouteClient {
    provider: Arc<dyn RouteProvider>,
    timeout: Duration,
}

impl RouteClient {
    pub fn new(provider: Arc<dyn RouteProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Client backed by the OSRM service named in `config`.
    pub fn osrm(config: &Config) -> Self {
        Self::new(Arc::new(OsrmProvider::new(config)), config.routing_timeout())
    }

    /// Route through `waypoints` in order.
    ///
    /// Returns `None` without touching the provider for fewer than two
    /// waypoints. Provider failures and timeouts yield the straight line.
    pub async fn compute_route(&self, waypoints: &[Coordinate]) -> Option<RouteResult> {
        if waypoints.len() < 2 {
            return None;
        }

        let outcome = match tokio::time::timeout(self.timeout, self.provider.fetch_route(waypoints)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(RouteError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(route) => Some(route),
            Err(err) => {
                tracing::warn!(
                    waypoints = waypoints.len(),
                    "Route unavailable, using straight line: {}",
                    err
                );
                Some(RouteResult::straight_line(waypoints))
            }
        }
    }
}
