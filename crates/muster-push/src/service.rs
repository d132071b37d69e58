//! Push delivery over the backend notification API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use muster_core::errors::PushError;
use muster_runtime::PushSender;

use crate::config::PushConfig;

/// Request body for a muster push.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MusterPushBody<'a> {
    user_id: &'a str,
    location: &'a str,
}

/// HTTP client for the backend notification API.
///
/// Stateless besides the connection pool; one instance serves the whole
/// process. Delivery is a single attempt — retry policy belongs to the
/// backend, not this client.
pub struct HttpPushClient {
    config: PushConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpPushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPushClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpPushClient {
    /// Build a client from config.
    pub fn new(config: PushConfig) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PushError::Transport(e.to_string()))?;

        info!(base_url = %config.base_url, "push client initialized");
        Ok(Self { config, client })
    }
}

#[async_trait]
impl PushSender for HttpPushClient {
    async fn send_push(&self, user_id: &str, location_label: &str) -> Result<(), PushError> {
        let body = MusterPushBody {
            user_id,
            location: location_label,
        };

        let response = self
            .client
            .post(self.config.muster_endpoint())
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(user_id, error = %e, "muster push transport error");
                PushError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            info!(user_id, location = location_label, "muster push delivered");
            return Ok(());
        }

        let reason = response.text().await.unwrap_or_default();
        warn!(user_id, status = status.as_u16(), reason = %reason, "muster push rejected");
        Err(PushError::Rejected {
            status: status.as_u16(),
            reason,
        })
    }
}
