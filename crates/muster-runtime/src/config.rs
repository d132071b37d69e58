//! Runtime configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use muster_core::wire::MUSTER_CHANNEL;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Configuration for the muster orchestrator.
///
/// All fields have production defaults; partial JSON deserializes with
/// missing fields defaulted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MusterConfig {
    /// Pub/sub channel all muster messages share.
    pub channel: String,
    /// Seconds an unresolved request stays active before expiring.
    pub request_timeout_secs: u64,
    /// Capacity of the notification event broadcast channel.
    pub event_capacity: usize,
}

impl Default for MusterConfig {
    fn default() -> Self {
        Self {
            channel: MUSTER_CHANNEL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            event_capacity: 256,
        }
    }
}

impl MusterConfig {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
