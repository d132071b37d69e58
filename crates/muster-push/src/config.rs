//! Push client configuration.

use serde::{Deserialize, Serialize};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the backend notification API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushConfig {
    /// Base URL of the notification API (no trailing slash).
    pub base_url: String,
    /// Bearer token authorizing muster pushes.
    pub api_token: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl PushConfig {
    /// Create a config with the default timeout.
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Endpoint receiving muster push requests.
    pub fn muster_endpoint(&self) -> String {
        format!("{}/notifications/muster", self.base_url.trim_end_matches('/'))
    }
}
