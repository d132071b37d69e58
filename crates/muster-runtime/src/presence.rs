//! Last-known presence cache.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use muster_core::errors::PresenceError;

use crate::traits::PresenceProvider;

/// Caches the most recent online/offline answer per user id.
///
/// Each [`refresh`](Self::refresh) replaces the mapping wholesale — entries
/// for ids absent from the new query are dropped, never merged. Unknown ids
/// read as offline; presence is never inferred as online.
pub struct PresenceCache {
    provider: Arc<dyn PresenceProvider>,
    entries: Mutex<HashMap<String, bool>>,
}

impl PresenceCache {
    /// Create a cache over the given provider. Starts empty.
    pub fn new(provider: Arc<dyn PresenceProvider>) -> Self {
        Self {
            provider,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Query the provider and replace the cached mapping.
    ///
    /// On [`PresenceError`] the cache is left untouched and the error
    /// surfaces; callers treat it as "assume offline" rather than retrying.
    pub async fn refresh(
        &self,
        user_ids: &HashSet<String>,
    ) -> Result<HashMap<String, bool>, PresenceError> {
        let fresh = self.provider.query_presence(user_ids).await?;
        debug!(queried = user_ids.len(), returned = fresh.len(), "presence refreshed");
        *self.entries.lock() = fresh.clone();
        Ok(fresh)
    }

    /// Last-known status for a user. Defaults to offline for unknown ids.
    pub fn is_online(&self, user_id: &str) -> bool {
        self.entries.lock().get(user_id).copied().unwrap_or(false)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
