//! User identity types.
//!
//! Muster routing is keyed by *nickname*, not user id — the friend roster
//! guarantees nickname uniqueness for the lifetime of a muster cycle, and
//! every wire message addresses its target by nickname. User ids are only
//! consulted for presence queries and push delivery.

use serde::{Deserialize, Serialize};

/// A friend as seen in the roster: stable id plus routing nickname.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Stable account id (presence / push routing).
    pub user_id: String,
    /// Display nickname (dedup / timer / wire routing key).
    pub nickname: String,
}

impl UserIdentity {
    /// Create an identity from id and nickname.
    pub fn new(user_id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            nickname: nickname.into(),
        }
    }
}

/// The local user's identity, stamped onto every outbound message.
///
/// Carries the close-up thumbnail URL published with requests and rejects
/// so the remote side can render it without a profile lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentity {
    /// Stable account id.
    pub user_id: String,
    /// Display nickname.
    pub nickname: String,
    /// Close-up thumbnail URL, if the profile has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl LocalIdentity {
    /// Create a local identity without a thumbnail.
    pub fn new(user_id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            nickname: nickname.into(),
            thumbnail: None,
        }
    }

    /// Builder: attach a thumbnail URL.
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }
}
