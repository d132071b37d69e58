//! Inbound channel message routing.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use muster_core::events::MusterEvent;
use muster_core::identity::LocalIdentity;
use muster_core::scene::display_scene_name;
use muster_core::wire::MusterMessage;

use crate::emitter::EventEmitter;

/// Decodes payloads arriving on the shared channel and forwards the ones
/// addressed to the local user as notification events.
///
/// Every subscriber receives every message — including its own — so routing
/// is identity filtering, not channel topology. The router never mutates
/// dedup or timer state: a reject only notifies; release happens via timer
/// expiry or explicit cancellation. Malformed payloads are logged and
/// dropped; a bad message must never take down the subscription.
pub struct MessageRouter {
    identity: LocalIdentity,
    channel: String,
    emitter: Arc<EventEmitter>,
}

impl MessageRouter {
    /// Create a router for the given identity and channel, emitting into the
    /// dispatcher's event stream.
    pub fn new(
        identity: LocalIdentity,
        channel: impl Into<String>,
        emitter: Arc<EventEmitter>,
    ) -> Self {
        Self {
            identity,
            channel: channel.into(),
            emitter,
        }
    }

    /// Handle one inbound transport message. Infallible by design: every
    /// failure mode is contained here.
    pub fn on_message(&self, channel: &str, raw_payload: &str) {
        if channel != self.channel {
            return;
        }

        let message = match MusterMessage::decode(raw_payload) {
            Ok(Some(message)) => message,
            Ok(None) => {
                trace!(channel, "ignoring non-muster message kind");
                return;
            }
            Err(e) => {
                warn!(channel, error = %e, "dropping malformed muster payload");
                return;
            }
        };

        match message {
            MusterMessage::Request {
                sender_nickname,
                sender_id,
                target_nickname,
                thumbnail,
                scene,
            } => {
                if target_nickname != self.identity.nickname {
                    return;
                }
                debug!(sender_nickname, scene, "muster request received");
                let _ = self.emitter.emit(MusterEvent::RequestReceived {
                    sender_nickname,
                    sender_id,
                    scene_label: display_scene_name(&scene).to_string(),
                    thumbnail,
                });
            }
            MusterMessage::Reject {
                sender_nickname,
                rejector_nickname,
                thumbnail: _,
            } => {
                // Only the original requester acts on a reject.
                if sender_nickname != self.identity.nickname {
                    return;
                }
                debug!(rejector_nickname, "muster request rejected");
                let _ = self.emitter.emit(MusterEvent::RequestRejected { rejector_nickname });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tokio::sync::broadcast::error::TryRecvError;

    use muster_core::wire::MUSTER_CHANNEL;

    fn router() -> (MessageRouter, tokio::sync::broadcast::Receiver<MusterEvent>) {
        let emitter = Arc::new(EventEmitter::new());
        let rx = emitter.subscribe();
        let router = MessageRouter::new(
            LocalIdentity::new("u0", "Bob"),
            MUSTER_CHANNEL,
            emitter,
        );
        (router, rx)
    }

    fn request_to(target: &str) -> String {
        MusterMessage::Request {
            sender_nickname: "Alice".into(),
            sender_id: "u1".into(),
            target_nickname: target.into(),
            thumbnail: Some("https://cdn/alice.png".into()),
            scene: "hideout".into(),
        }
        .encode()
        .unwrap()
    }

    #[tokio::test]
    async fn request_for_self_is_forwarded_with_scene_label() {
        let (router, mut rx) = router();
        router.on_message(MUSTER_CHANNEL, &request_to("Bob"));

        let event = rx.recv().await.unwrap();
        assert_matches!(event, MusterEvent::RequestReceived { sender_nickname, sender_id, scene_label, thumbnail } => {
            assert_eq!(sender_nickname, "Alice");
            assert_eq!(sender_id, "u1");
            assert_eq!(scene_label, "the Hideout");
            assert_eq!(thumbnail.as_deref(), Some("https://cdn/alice.png"));
        });
    }

    #[tokio::test]
    async fn request_for_someone_else_is_ignored() {
        let (router, mut rx) = router();
        router.on_message(MUSTER_CHANNEL, &request_to("Carol"));
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn reject_for_own_request_is_forwarded() {
        let (router, mut rx) = router();
        let payload = MusterMessage::Reject {
            sender_nickname: "Bob".into(),
            rejector_nickname: "Alice".into(),
            thumbnail: None,
        }
        .encode()
        .unwrap();
        router.on_message(MUSTER_CHANNEL, &payload);

        let event = rx.recv().await.unwrap();
        assert_matches!(event, MusterEvent::RequestRejected { rejector_nickname } => {
            assert_eq!(rejector_nickname, "Alice");
        });
    }

    #[tokio::test]
    async fn reject_for_another_requester_is_ignored() {
        let (router, mut rx) = router();
        let payload = MusterMessage::Reject {
            sender_nickname: "Carol".into(),
            rejector_nickname: "Alice".into(),
            thumbnail: None,
        }
        .encode()
        .unwrap();
        router.on_message(MUSTER_CHANNEL, &payload);
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn other_channels_are_ignored() {
        let (router, mut rx) = router();
        router.on_message("friend_channel", &request_to("Bob"));
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn unknown_type_is_ignored_without_error() {
        let (router, mut rx) = router();
        router.on_message(MUSTER_CHANNEL, r#"{"type":"friend_online","userId":"u9"}"#);
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn malformed_payloads_are_dropped_silently() {
        let (router, mut rx) = router();
        for raw in ["not json", "[]", "{}", r#"{"type":"muster_request"}"#] {
            router.on_message(MUSTER_CHANNEL, raw);
        }
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));

        // Router still works after bad input.
        router.on_message(MUSTER_CHANNEL, &request_to("Bob"));
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn unknown_scene_maps_to_fallback_label() {
        let (router, mut rx) = router();
        let payload = MusterMessage::Request {
            sender_nickname: "Alice".into(),
            sender_id: "u1".into(),
            target_nickname: "Bob".into(),
            thumbnail: None,
            scene: "SomeInternalScene".into(),
        }
        .encode()
        .unwrap();
        router.on_message(MUSTER_CHANNEL, &payload);

        let event = rx.recv().await.unwrap();
        assert_matches!(event, MusterEvent::RequestReceived { scene_label, .. } => {
            assert_eq!(scene_label, "somewhere");
        });
    }
}
