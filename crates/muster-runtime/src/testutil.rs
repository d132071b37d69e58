//! Recording fakes for the collaborator traits.
//!
//! Shared by unit tests and the integration scenarios — each fake records
//! the calls it receives and can be flipped into a failure mode.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use muster_core::errors::{PresenceError, PublishError, PushError};

use crate::traits::{MusterTransport, PresenceProvider, PushSender};

/// In-memory transport that records every publish.
#[derive(Default)]
pub struct FakeTransport {
    published: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl FakeTransport {
    /// Create a transport that accepts every publish.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of `(channel, payload)` pairs published so far.
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().clone()
    }

    /// Number of publishes recorded.
    pub fn publish_count(&self) -> usize {
        self.published.lock().len()
    }
}

#[async_trait]
impl MusterTransport for FakeTransport {
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), PublishError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError {
                channel: channel.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.published
            .lock()
            .push((channel.to_string(), payload.to_string()));
        Ok(())
    }
}

/// Presence provider backed by an in-memory online set.
#[derive(Default)]
pub struct FakePresence {
    online: Mutex<HashSet<String>>,
    unavailable: AtomicBool,
    queries: Mutex<Vec<HashSet<String>>>,
}

impl FakePresence {
    /// Create a provider where every user is offline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: mark a user online.
    #[must_use]
    pub fn with_online(self, user_id: &str) -> Self {
        let _ = self.online.lock().insert(user_id.to_string());
        self
    }

    /// Mark a user online or offline after construction.
    pub fn set_online(&self, user_id: &str, online: bool) {
        let mut set = self.online.lock();
        if online {
            let _ = set.insert(user_id.to_string());
        } else {
            let _ = set.remove(user_id);
        }
    }

    /// Make subsequent queries fail with [`PresenceError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of queries received.
    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl PresenceProvider for FakePresence {
    async fn query_presence(
        &self,
        user_ids: &HashSet<String>,
    ) -> Result<HashMap<String, bool>, PresenceError> {
        self.queries.lock().push(user_ids.clone());
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PresenceError::Unavailable("injected failure".to_string()));
        }
        let online = self.online.lock();
        Ok(user_ids
            .iter()
            .map(|id| (id.clone(), online.contains(id)))
            .collect())
    }
}

/// Push sender that records every delivery.
#[derive(Default)]
pub struct FakePush {
    sent: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl FakePush {
    /// Create a push sender that accepts every delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of `(user_id, location_label)` pairs sent so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }

    /// Number of pushes recorded.
    pub fn send_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl PushSender for FakePush {
    async fn send_push(&self, user_id: &str, location_label: &str) -> Result<(), PushError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PushError::Transport("injected failure".to_string()));
        }
        self.sent
            .lock()
            .push((user_id.to_string(), location_label.to_string()));
        Ok(())
    }
}
