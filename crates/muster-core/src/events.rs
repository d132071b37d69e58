//! Notification events emitted by the orchestrator.
//!
//! These are the orchestrator's only outbound surface toward presentation:
//! the UI/toast layer subscribes to a broadcast of [`MusterEvent`] and renders
//! each variant however it sees fit. The orchestrator never renders anything
//! itself.

use serde::{Deserialize, Serialize};

/// Events describing the lifecycle of muster requests, as seen by the
/// notification layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MusterEvent {
    /// An outbound request was dispatched (sender-side feedback).
    #[serde(rename = "request_sent")]
    RequestSent {
        /// Nickname of the invited friend.
        #[serde(rename = "targetNickname")]
        target_nickname: String,
    },

    /// Someone asked the local user to join them (receiver-side).
    #[serde(rename = "request_received")]
    RequestReceived {
        /// Requester's nickname.
        #[serde(rename = "senderNickname")]
        sender_nickname: String,
        /// Requester's account id (for the "go there" action).
        #[serde(rename = "senderId")]
        sender_id: String,
        /// Human-readable label of the requester's location.
        #[serde(rename = "sceneLabel")]
        scene_label: String,
        /// Requester's thumbnail URL.
        #[serde(skip_serializing_if = "Option::is_none")]
        thumbnail: Option<String>,
    },

    /// A previously sent request was declined by its target (sender-side).
    #[serde(rename = "request_rejected")]
    RequestRejected {
        /// Nickname of the friend who declined.
        #[serde(rename = "rejectorNickname")]
        rejector_nickname: String,
    },

    /// A request's timeout elapsed without resolution (sender-side; the UI
    /// clears the "mustered" indicator for this friend).
    #[serde(rename = "request_expired")]
    RequestExpired {
        /// Nickname of the invited friend.
        #[serde(rename = "targetNickname")]
        target_nickname: String,
    },
}

impl MusterEvent {
    /// The event's wire `"type"` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RequestSent { .. } => "request_sent",
            Self::RequestReceived { .. } => "request_received",
            Self::RequestRejected { .. } => "request_rejected",
            Self::RequestExpired { .. } => "request_expired",
        }
    }
}
