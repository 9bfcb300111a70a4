//! Configuration from environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub routing_url: String,
    pub routing_profile: String,
    pub routing_timeout_s: u64,
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            routing_url: "https://router.project-osrm.org".to_string(),
            routing_profile: "driving".to_string(),
            routing_timeout_s: 10,
            data_dir: PathBuf::from(".roadtrip"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            routing_url: env::var("ROUTING_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.routing_url),
            routing_profile: env::var("ROUTING_PROFILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.routing_profile),
            routing_timeout_s: env::var("ROUTING_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.routing_timeout_s),
            data_dir: env::var("ROADTRIP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }

    /// Upper bound on a single routing request, never below one second.
    pub fn routing_timeout(&self) -> Duration {
        Duration::from_secs(self.routing_timeout_s.max(1))
    }
}
