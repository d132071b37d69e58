//! End-to-end muster flows over recording fakes: dispatch branches, timer
//! expiry, dedup behavior, and two-party routing on a shared channel.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use tokio::sync::broadcast::error::TryRecvError;

use muster_core::events::MusterEvent;
use muster_core::identity::LocalIdentity;
use muster_core::wire::{MusterMessage, MUSTER_CHANNEL};
use muster_runtime::testutil::{FakePresence, FakePush, FakeTransport};
use muster_runtime::{
    MessageRouter, MusterConfig, MusterDispatch, MusterTransport, PresenceProvider, PushSender,
    RequestDispatcher,
};

struct Party {
    dispatcher: RequestDispatcher,
    router: MessageRouter,
    transport: Arc<FakeTransport>,
    presence: Arc<FakePresence>,
    push: Arc<FakePush>,
}

fn party(identity: LocalIdentity, presence: FakePresence) -> Party {
    let transport = Arc::new(FakeTransport::new());
    let presence = Arc::new(presence);
    let push = Arc::new(FakePush::new());
    let dispatcher = RequestDispatcher::new(
        identity.clone(),
        MusterConfig::default(),
        Arc::clone(&presence) as Arc<dyn PresenceProvider>,
        Arc::clone(&transport) as Arc<dyn MusterTransport>,
        Arc::clone(&push) as Arc<dyn PushSender>,
    );
    dispatcher.set_scene("square");
    let router = MessageRouter::new(identity, MUSTER_CHANNEL, Arc::clone(dispatcher.emitter()));
    Party {
        dispatcher,
        router,
        transport,
        presence,
        push,
    }
}

fn bob() -> LocalIdentity {
    LocalIdentity::new("u0", "Bob").with_thumbnail("https://cdn/bob.png")
}

fn alice() -> LocalIdentity {
    LocalIdentity::new("u1", "Alice").with_thumbnail("https://cdn/alice.png")
}

// Scenario A: offline target → one push, no publish, no timer.
#[tokio::test]
async fn offline_target_gets_exactly_one_push() {
    let sender = party(bob(), FakePresence::new());

    let outcome = sender
        .dispatcher
        .send_muster_request("Alice", "u1", Some("thumb.png"))
        .await
        .unwrap();

    assert_eq!(outcome, MusterDispatch::PushFallback);
    assert_eq!(sender.push.send_count(), 1);
    assert_eq!(sender.transport.publish_count(), 0);
    assert!(!sender.dispatcher.has_timer("Alice"));
}

// Scenario B: online target → one publish, guard held, expiry after 180 s
// releases the guard and emits request_expired exactly once.
#[tokio::test(start_paused = true)]
async fn online_target_publish_then_expiry() {
    let sender = party(bob(), FakePresence::new().with_online("u1"));
    let mut events = sender.dispatcher.subscribe();

    let outcome = sender
        .dispatcher
        .send_muster_request("Alice", "u1", None)
        .await
        .unwrap();
    assert_eq!(outcome, MusterDispatch::Published);

    let published = sender.transport.published();
    assert_eq!(published.len(), 1);
    let msg = MusterMessage::decode(&published[0].1).unwrap().unwrap();
    assert_eq!(msg.message_type(), "muster_request");

    assert!(sender.dispatcher.is_mustered("Alice"));
    assert!(sender.dispatcher.has_timer("Alice"));
    assert_eq!(events.recv().await.unwrap().event_type(), "request_sent");

    tokio::time::sleep(Duration::from_secs(181)).await;

    assert!(!sender.dispatcher.is_mustered("Alice"));
    assert_matches!(
        events.recv().await.unwrap(),
        MusterEvent::RequestExpired { target_nickname } if target_nickname == "Alice"
    );
    assert_matches!(events.try_recv(), Err(TryRecvError::Empty));
}

// Scenario C: back-to-back dispatches to the same target → one publish.
#[tokio::test]
async fn second_dispatch_before_expiry_is_suppressed() {
    let sender = party(bob(), FakePresence::new().with_online("u1"));

    let first = sender
        .dispatcher
        .send_muster_request("Alice", "u1", None)
        .await
        .unwrap();
    let second = sender
        .dispatcher
        .send_muster_request("Alice", "u1", None)
        .await
        .unwrap();

    assert_eq!(first, MusterDispatch::Published);
    assert_eq!(second, MusterDispatch::Duplicate);
    assert_eq!(sender.transport.publish_count(), 1);
}

// Scenario D: reject addressed to us → notification fires, guard untouched.
#[tokio::test]
async fn reject_notifies_sender_without_releasing_guard() {
    let sender = party(bob(), FakePresence::new().with_online("u1"));
    let mut events = sender.dispatcher.subscribe();

    let _ = sender
        .dispatcher
        .send_muster_request("Alice", "u1", None)
        .await
        .unwrap();
    assert_eq!(events.recv().await.unwrap().event_type(), "request_sent");

    let reject = MusterMessage::Reject {
        sender_nickname: "Bob".into(),
        rejector_nickname: "Alice".into(),
        thumbnail: None,
    }
    .encode()
    .unwrap();
    sender.router.on_message(MUSTER_CHANNEL, &reject);

    assert_matches!(
        events.recv().await.unwrap(),
        MusterEvent::RequestRejected { rejector_nickname } if rejector_nickname == "Alice"
    );
    // Deliberate: the sender waits out the full timeout even after a reject.
    assert!(sender.dispatcher.is_mustered("Alice"));
    assert!(sender.dispatcher.has_timer("Alice"));
}

// Scenario E: unrecognized message type → no handler, no error, router alive.
#[tokio::test]
async fn unknown_message_type_leaves_router_intact() {
    let receiver = party(alice(), FakePresence::new());
    let mut events = receiver.dispatcher.subscribe();

    receiver
        .router
        .on_message(MUSTER_CHANNEL, r#"{"type":"voice_invite","roomId":"r1"}"#);
    assert_matches!(events.try_recv(), Err(TryRecvError::Empty));

    // A real request still routes afterwards.
    let request = MusterMessage::Request {
        sender_nickname: "Bob".into(),
        sender_id: "u0".into(),
        target_nickname: "Alice".into(),
        thumbnail: None,
        scene: "square".into(),
    }
    .encode()
    .unwrap();
    receiver.router.on_message(MUSTER_CHANNEL, &request);
    assert_eq!(events.recv().await.unwrap().event_type(), "request_received");
}

// Full two-party cycle on one shared channel, including the self-delivered
// copy every subscriber receives.
#[tokio::test]
async fn two_party_request_and_reject_cycle() {
    let sender = party(bob(), FakePresence::new().with_online("u1"));
    let receiver = party(alice(), FakePresence::new());
    let mut sender_events = sender.dispatcher.subscribe();
    let mut receiver_events = receiver.dispatcher.subscribe();

    // Bob dispatches; the channel delivers the payload to every subscriber.
    let _ = sender
        .dispatcher
        .send_muster_request("Alice", "u1", None)
        .await
        .unwrap();
    let (channel, payload) = sender.transport.published().remove(0);
    sender.router.on_message(&channel, &payload);
    receiver.router.on_message(&channel, &payload);

    assert_eq!(sender_events.recv().await.unwrap().event_type(), "request_sent");
    // Bob's own copy is filtered by target identity — nothing else for him yet.
    assert_matches!(sender_events.try_recv(), Err(TryRecvError::Empty));

    let received = receiver_events.recv().await.unwrap();
    assert_matches!(received, MusterEvent::RequestReceived { sender_nickname, sender_id, scene_label, .. } => {
        assert_eq!(sender_nickname, "Bob");
        assert_eq!(sender_id, "u0");
        assert_eq!(scene_label, "the Square");
    });

    // Alice declines; her reject fans out to both parties too.
    receiver.dispatcher.send_reject("Bob").await.unwrap();
    let (channel, payload) = receiver.transport.published().remove(0);
    sender.router.on_message(&channel, &payload);
    receiver.router.on_message(&channel, &payload);

    assert_matches!(
        sender_events.recv().await.unwrap(),
        MusterEvent::RequestRejected { rejector_nickname } if rejector_nickname == "Alice"
    );
    // Alice is not the requester, so her own copy routes nowhere.
    assert_matches!(receiver_events.try_recv(), Err(TryRecvError::Empty));

    // Presence was asked exactly once, for Alice's id.
    assert_eq!(sender.presence.query_count(), 1);
    assert_eq!(receiver.push.send_count(), 0);
}
