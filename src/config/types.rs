use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub knot: KnotConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Buffer bounds for the knot's channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnotConfig {
    /// Maximum events waiting at the merge point (default: 256).
    /// Dispatch onto a full bus fails instead of blocking.
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
    /// Per-subscriber buffer for the event and state broadcasts (default: 1024).
    /// Subscribers and epic inputs that fall further behind than this miss
    /// events: subscribers get `Lagged`, epic inputs log the gap and go on.
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

/// Settings for the movie API used by the demo binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// JSON fixture served instead of a network API.
    #[serde(default)]
    pub fixture: Option<PathBuf>,
    /// Artificial latency added to every fixture call, in milliseconds.
    #[serde(default)]
    pub latency_ms: u64,
}

fn default_bus_capacity() -> usize {
    256
}

fn default_broadcast_capacity() -> usize {
    1024
}

impl Default for KnotConfig {
    fn default() -> Self {
        Self {
            bus_capacity: default_bus_capacity(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}
