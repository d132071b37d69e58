//! Collaborator seams for the orchestrator.
//!
//! The runtime owns none of the infrastructure it coordinates: the pub/sub
//! transport is assumed connected and subscribed, presence lives in the
//! real-time backend, and push delivery is a platform service. Each is a
//! trait so the orchestrator can be driven by production adapters or by the
//! recording fakes in [`crate::testutil`].

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use muster_core::errors::{PresenceError, PublishError, PushError};

/// Publish side of the shared pub/sub channel.
///
/// Inbound delivery is not part of this trait: the transport's subscription
/// callback hands payloads to [`crate::MessageRouter::on_message`].
#[async_trait]
pub trait MusterTransport: Send + Sync {
    /// Publish a serialized payload on the named channel. Single attempt,
    /// no retry; failure surfaces to the dispatching caller.
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), PublishError>;
}

/// On-demand presence lookup against the real-time backend.
#[async_trait]
pub trait PresenceProvider: Send + Sync {
    /// Query online status for a set of user ids.
    ///
    /// Ids absent from the returned map are treated as offline by callers,
    /// as is the entire set when the query fails.
    async fn query_presence(
        &self,
        user_ids: &HashSet<String>,
    ) -> Result<HashMap<String, bool>, PresenceError>;
}

/// Push-notification fallback for offline targets.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Deliver a muster push to the given user, carrying the sender's
    /// current location label. Single attempt.
    async fn send_push(&self, user_id: &str, location_label: &str) -> Result<(), PushError>;
}
