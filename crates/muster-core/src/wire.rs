//! Wire format for the shared muster channel.
//!
//! Every participant subscribes to one well-known channel and receives every
//! message published on it, including its own. Messages are flat JSON objects
//! dispatched on the `"type"` field; identity fields in the payload decide
//! whether a given subscriber acts on a message.
//!
//! Decoding is deliberately lenient: a payload with an unrecognized `"type"`
//! is not an error (future message kinds must not break old clients), and the
//! optional `thumbnail` field may be absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::WireError;

/// Well-known channel name shared by all muster participants.
pub const MUSTER_CHANNEL: &str = "notification_channel";

/// Message kinds carried on the muster channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MusterMessage {
    /// One user asking a friend to join them at their current scene.
    #[serde(rename = "muster_request")]
    Request {
        /// Requester's nickname.
        #[serde(rename = "senderNickname")]
        sender_nickname: String,
        /// Requester's account id (used by the receiver for teleport).
        #[serde(rename = "senderId")]
        sender_id: String,
        /// Nickname of the friend being invited.
        #[serde(rename = "targetNickname")]
        target_nickname: String,
        /// Requester's close-up thumbnail URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail: Option<String>,
        /// Scene id of the requester's current location.
        scene: String,
    },

    /// A receiver declining a request, addressed back to the requester.
    #[serde(rename = "muster_reject")]
    Reject {
        /// Nickname of the original requester.
        #[serde(rename = "senderNickname")]
        sender_nickname: String,
        /// Nickname of the user who declined.
        #[serde(rename = "rejectorNickname")]
        rejector_nickname: String,
        /// Rejector's close-up thumbnail URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail: Option<String>,
    },
}

impl MusterMessage {
    /// Serialize to the flat JSON text published on the channel.
    pub fn encode(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(|e| WireError::Encode(e.to_string()))
    }

    /// Decode an inbound payload.
    ///
    /// Returns `Ok(None)` when the payload is a well-formed object whose
    /// `"type"` is not a muster message kind. Returns `Err` when the payload
    /// is not valid JSON, not an object, is missing `"type"`, or a known
    /// kind is missing required fields.
    pub fn decode(raw: &str) -> Result<Option<Self>, WireError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| WireError::Malformed(e.to_string()))?;
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Err(WireError::MissingType);
        };
        match kind {
            "muster_request" | "muster_reject" => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| WireError::Malformed(e.to_string())),
            _ => Ok(None),
        }
    }

    /// The wire `"type"` tag of this message.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::Request { .. } => "muster_request",
            Self::Reject { .. } => "muster_reject",
        }
    }
}
