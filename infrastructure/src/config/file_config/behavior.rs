//! Behavior configuration from TOML (`[behavior]` section)

use serde::{Deserialize, Serialize};
use triplecheck_application::BehaviorConfig;
use triplecheck_application::config::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Raw behavior configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Per-provider HTTP timeout in seconds
    pub request_timeout_secs: u64,
    /// Round-level timeout in seconds; unset means rounds wait indefinitely
    pub round_timeout_secs: Option<u64>,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            round_timeout_secs: None,
        }
    }
}

impl FileBehaviorConfig {
    pub fn to_behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig::from_timeout_seconds(
            Some(self.request_timeout_secs),
            self.round_timeout_secs,
        )
    }
}
