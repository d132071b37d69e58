//! Per-target request de-duplication.

use std::collections::HashSet;

use parking_lot::Mutex;
use tracing::debug;

/// Tracks which targets currently have an unresolved muster request.
///
/// [`try_acquire`](Self::try_acquire) is an atomic check-and-set: between a
/// successful acquire and the matching [`release`](Self::release), no second
/// request for the same target key can be dispatched. Keys are nicknames —
/// the roster guarantees their uniqueness for the lifetime of a cycle.
#[derive(Default)]
pub struct DedupGuard {
    active: Mutex<HashSet<String>>,
}

impl DedupGuard {
    /// Create an empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` active iff it is not already. Returns whether the caller
    /// won the slot.
    pub fn try_acquire(&self, key: &str) -> bool {
        let acquired = self.active.lock().insert(key.to_string());
        if !acquired {
            debug!(key, "muster target already active");
        }
        acquired
    }

    /// Release `key`. Idempotent; releasing an inactive key is a no-op.
    pub fn release(&self, key: &str) {
        let _ = self.active.lock().remove(key);
    }

    /// Whether `key` currently has an unresolved request. UI callers check
    /// this before even attempting dispatch; the atomic acquire inside the
    /// dispatcher remains the authoritative gate.
    pub fn is_active(&self, key: &str) -> bool {
        self.active.lock().contains(key)
    }

    /// Number of active targets.
    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }
}
