//! Outbound muster request orchestration.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use muster_core::errors::DispatchError;
use muster_core::events::MusterEvent;
use muster_core::identity::LocalIdentity;
use muster_core::scene::display_scene_name;
use muster_core::wire::MusterMessage;

use crate::config::MusterConfig;
use crate::dedup::DedupGuard;
use crate::emitter::EventEmitter;
use crate::presence::PresenceCache;
use crate::timers::TimerRegistry;
use crate::traits::{MusterTransport, PresenceProvider, PushSender};

/// How an accepted dispatch was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusterDispatch {
    /// Target online — request published on the shared channel, timer running.
    Published,
    /// Target offline — push notification sent, resolution is out-of-band.
    PushFallback,
    /// Target already has an unresolved request; nothing was sent.
    Duplicate,
}

/// Dispatches muster requests: dedup check, presence lookup, channel publish
/// or push fallback, and expiry timer tracking.
///
/// All collaborators are constructor-supplied; there is no global instance.
pub struct RequestDispatcher {
    identity: LocalIdentity,
    config: MusterConfig,
    presence: PresenceCache,
    transport: Arc<dyn MusterTransport>,
    push: Arc<dyn PushSender>,
    dedup: Arc<DedupGuard>,
    timers: TimerRegistry,
    emitter: Arc<EventEmitter>,
    /// Scene id of the local user's current location.
    current_scene: Mutex<String>,
}

impl RequestDispatcher {
    /// Create a dispatcher for the given local identity.
    pub fn new(
        identity: LocalIdentity,
        config: MusterConfig,
        presence_provider: Arc<dyn PresenceProvider>,
        transport: Arc<dyn MusterTransport>,
        push: Arc<dyn PushSender>,
    ) -> Self {
        let emitter = Arc::new(EventEmitter::with_capacity(config.event_capacity));
        Self {
            identity,
            config,
            presence: PresenceCache::new(presence_provider),
            transport,
            push,
            dedup: Arc::new(DedupGuard::new()),
            timers: TimerRegistry::new(),
            emitter,
            current_scene: Mutex::new(String::new()),
        }
    }

    /// The notification event emitter (shared with the message router).
    pub fn emitter(&self) -> &Arc<EventEmitter> {
        &self.emitter
    }

    /// Subscribe to notification events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<MusterEvent> {
        self.emitter.subscribe()
    }

    /// Record the local user's current scene id.
    pub fn set_scene(&self, scene_id: impl Into<String>) {
        *self.current_scene.lock() = scene_id.into();
    }

    /// Whether `nickname` currently has an unresolved request. UI callers
    /// consult this before attempting dispatch; the dispatcher re-checks
    /// atomically either way.
    pub fn is_mustered(&self, nickname: &str) -> bool {
        self.dedup.is_active(nickname)
    }

    /// Number of targets with an unresolved request.
    pub fn active_count(&self) -> usize {
        self.dedup.active_count()
    }

    /// Whether a timer is live for `nickname`.
    pub fn has_timer(&self, nickname: &str) -> bool {
        self.timers.has_timer(nickname)
    }

    /// Send a muster request to one friend.
    ///
    /// `thumbnail_url` overrides the local identity's thumbnail on the wire
    /// when given. Returns how the dispatch was resolved; duplicate targets
    /// are normal control flow, not an error. On failure the dedup mark is
    /// rolled back, no timer is started, and the error surfaces to the
    /// caller for user-facing messaging.
    #[instrument(skip(self, thumbnail_url), fields(target_nickname, target_user_id))]
    pub async fn send_muster_request(
        &self,
        target_nickname: &str,
        target_user_id: &str,
        thumbnail_url: Option<&str>,
    ) -> Result<MusterDispatch, DispatchError> {
        if !self.dedup.try_acquire(target_nickname) {
            debug!(target_nickname, "duplicate muster request suppressed");
            return Ok(MusterDispatch::Duplicate);
        }
        let _ = self.emitter.emit(MusterEvent::RequestSent {
            target_nickname: target_nickname.to_string(),
        });

        match self
            .dispatch(target_nickname, target_user_id, thumbnail_url)
            .await
        {
            Ok(outcome) => {
                match outcome {
                    MusterDispatch::Published => {
                        let dedup = Arc::clone(&self.dedup);
                        let emitter = Arc::clone(&self.emitter);
                        self.timers.start(
                            target_nickname,
                            self.config.request_timeout(),
                            move |key| {
                                dedup.release(&key);
                                let _ = emitter.emit(MusterEvent::RequestExpired {
                                    target_nickname: key,
                                });
                            },
                        );
                        info!(target_nickname, "muster request published");
                    }
                    MusterDispatch::PushFallback => {
                        // No local timer: nothing to expire, so no dedup
                        // entry either — set membership and timer existence
                        // move together.
                        self.dedup.release(target_nickname);
                        info!(target_nickname, "muster push fallback sent");
                    }
                    MusterDispatch::Duplicate => unreachable!("guard was acquired"),
                }
                Ok(outcome)
            }
            Err(e) => {
                warn!(target_nickname, error = %e, "muster dispatch failed");
                self.dedup.release(target_nickname);
                Err(e)
            }
        }
    }

    /// Presence check and the actual send. Guard handling lives in the caller.
    async fn dispatch(
        &self,
        target_nickname: &str,
        target_user_id: &str,
        thumbnail_url: Option<&str>,
    ) -> Result<MusterDispatch, DispatchError> {
        let scene = self.current_scene.lock().clone();

        let ids: HashSet<String> = std::iter::once(target_user_id.to_string()).collect();
        let online = match self.presence.refresh(&ids).await {
            Ok(map) => map.get(target_user_id).copied().unwrap_or(false),
            Err(e) => {
                debug!(target_user_id, error = %e, "presence unavailable, assuming offline");
                false
            }
        };

        if !online {
            let label = display_scene_name(&scene);
            self.push.send_push(target_user_id, label).await?;
            return Ok(MusterDispatch::PushFallback);
        }

        let message = MusterMessage::Request {
            sender_nickname: self.identity.nickname.clone(),
            sender_id: self.identity.user_id.clone(),
            target_nickname: target_nickname.to_string(),
            thumbnail: thumbnail_url
                .map(ToString::to_string)
                .or_else(|| self.identity.thumbnail.clone()),
            scene,
        };
        let payload = message.encode()?;
        self.transport.publish(&self.config.channel, &payload).await?;
        Ok(MusterDispatch::Published)
    }

    /// Decline a received request: publish a `muster_reject` addressed back
    /// to the original requester. Single attempt; publish errors surface.
    #[instrument(skip(self), fields(sender_nickname))]
    pub async fn send_reject(&self, sender_nickname: &str) -> Result<(), DispatchError> {
        let message = MusterMessage::Reject {
            sender_nickname: sender_nickname.to_string(),
            rejector_nickname: self.identity.nickname.clone(),
            thumbnail: self.identity.thumbnail.clone(),
        };
        let payload = message.encode()?;
        self.transport.publish(&self.config.channel, &payload).await?;
        info!(sender_nickname, "muster reject published");
        Ok(())
    }

    /// Cancel the timer and release the dedup entry for one target.
    pub fn cancel_request(&self, nickname: &str) {
        let _ = self.timers.cancel(nickname);
        self.dedup.release(nickname);
    }

    /// Teardown: cancel every live timer so no expiry callback can fire
    /// against discarded state.
    pub fn shutdown(&self) {
        self.timers.cancel_all();
    }
}
