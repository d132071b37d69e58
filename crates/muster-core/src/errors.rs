//! Error taxonomy shared across the muster crates.
//!
//! Failure policy in one place:
//!
//! - Presence lookup failures are recoverable — callers assume offline.
//! - Outbound dispatch failures surface to the caller after the dedup guard
//!   has been rolled back; user-facing messaging is the caller's job.
//! - Inbound wire failures are contained in the router and never propagate
//!   to the transport layer.

use thiserror::Error;

/// Presence subsystem failures.
#[derive(Debug, Error)]
pub enum PresenceError {
    /// The presence backend is unreachable or not configured.
    /// Callers treat affected users as offline rather than retrying.
    #[error("presence subsystem unavailable: {0}")]
    Unavailable(String),
}

/// Failure publishing a message on the shared channel.
#[derive(Debug, Error)]
#[error("publish on {channel} failed: {reason}")]
pub struct PublishError {
    /// Channel the publish was attempted on.
    pub channel: String,
    /// Transport-reported reason.
    pub reason: String,
}

/// Failure delivering a push notification.
#[derive(Debug, Error)]
pub enum PushError {
    /// The push endpoint rejected the request.
    #[error("push endpoint returned {status}: {reason}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        reason: String,
    },
    /// The request never reached the endpoint.
    #[error("push transport error: {0}")]
    Transport(String),
}

/// Failure encoding or decoding a wire payload.
#[derive(Debug, Error)]
pub enum WireError {
    /// Payload could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(String),
    /// Payload is not valid JSON or a known kind is missing fields.
    #[error("malformed payload: {0}")]
    Malformed(String),
    /// Payload is JSON but carries no string `"type"` field.
    #[error("payload has no type field")]
    MissingType,
}

/// Failure during an outbound muster dispatch. The dedup guard has already
/// been released when one of these reaches the caller.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Publishing the request on the channel failed.
    #[error(transparent)]
    Publish(#[from] PublishError),
    /// The offline push fallback failed.
    #[error(transparent)]
    Push(#[from] PushError),
    /// The outbound message could not be encoded.
    #[error(transparent)]
    Wire(#[from] WireError),
}
