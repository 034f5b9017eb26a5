//! Configuration system.
//!
//! Loads match configuration from JSON strings/files (file IO left to app).

use serde::{Deserialize, Serialize};

/// Root configuration shared by client/server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Server address, e.g. `127.0.0.1:40100`. The server binds it, the
    /// client sends to it.
    pub server_addr: String,
    /// Client report rate (state reports per second).
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Player name (client only, used for logging).
    #[serde(default = "default_player_name")]
    pub player_name: String,
}

fn default_tick_hz() -> u32 {
    30
}

fn default_player_name() -> String {
    "Fighter".to_string()
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:40100".to_string(),
            tick_hz: default_tick_hz(),
            player_name: default_player_name(),
        }
    }
}

impl MatchConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
