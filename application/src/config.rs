//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as per-request and per-round timeouts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-provider request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Application behavior configuration.
///
/// `request_timeout` is handed to each backend's HTTP client. `round_timeout`
/// bounds a whole round; when it is `None` a stuck provider leaves its slot
/// pending and the round never completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Maximum time a single backend call may take.
    pub request_timeout: Option<Duration>,
    /// Maximum time to wait for every provider of a round.
    pub round_timeout: Option<Duration>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            round_timeout: None,
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig from optional timeouts in seconds.
    ///
    /// If a value is `None`, that timeout is not applied.
    pub fn from_timeout_seconds(request: Option<u64>, round: Option<u64>) -> Self {
        Self {
            request_timeout: request.map(Duration::from_secs),
            round_timeout: round.map(Duration::from_secs),
        }
    }

    pub fn with_round_timeout(mut self, timeout: Duration) -> Self {
        self.round_timeout = Some(timeout);
        self
    }
}
