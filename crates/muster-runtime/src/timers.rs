//! Cancellable per-target countdown timers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A live countdown for one target key.
struct TimerEntry {
    /// Distinguishes this timer from a later `start` on the same key, so a
    /// stale fired task cannot claim a replacement's entry.
    generation: u64,
    cancel: CancellationToken,
}

/// Shared registry state. Held by the registry and by every spawned task.
#[derive(Default)]
struct RegistryInner {
    timers: HashMap<String, TimerEntry>,
    next_generation: u64,
}

/// Owns at most one cancellable countdown per target key.
///
/// Firing claims the registry entry under the lock *before* the expiry
/// callback runs: a `cancel` racing a near-simultaneous fire results in
/// exactly one outcome — either the cancel removes the entry first and the
/// callback never runs, or the fire claims it and the cancel is a no-op.
/// Entry removal preceding the callback also means re-entrant `start` or
/// `cancel` calls for the same key observe a clean slate, and a panicking
/// callback cannot corrupt the registry.
#[derive(Default)]
pub struct TimerRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown for `key`, cancelling any existing timer for the
    /// same key first. When `duration` elapses without cancellation,
    /// `on_expire` is invoked exactly once with the key.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&self, key: &str, duration: Duration, on_expire: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let generation = {
            let mut inner = self.inner.lock();
            if let Some(previous) = inner.timers.remove(key) {
                debug!(key, "restarting muster timer");
                previous.cancel.cancel();
            }
            inner.next_generation += 1;
            let generation = inner.next_generation;
            let _ = inner.timers.insert(
                key.to_string(),
                TimerEntry {
                    generation,
                    cancel: cancel.clone(),
                },
            );
            generation
        };

        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        let _ = tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(duration) => {
                    // Claim our entry before running the callback. A racing
                    // cancel or restart may have removed or replaced it.
                    let claimed = {
                        let mut inner = inner.lock();
                        match inner.timers.get(&key) {
                            Some(entry) if entry.generation == generation => {
                                let _ = inner.timers.remove(&key);
                                true
                            }
                            _ => false,
                        }
                    };
                    if claimed {
                        debug!(key, "muster timer expired");
                        on_expire(key);
                    }
                }
            }
        });
    }

    /// Stop and discard the timer for `key`. Returns whether one was live.
    pub fn cancel(&self, key: &str) -> bool {
        let removed = self.inner.lock().timers.remove(key);
        match removed {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every live timer. Called at teardown so expiry callbacks can
    /// never fire against discarded state.
    pub fn cancel_all(&self) {
        let drained: Vec<_> = {
            let mut inner = self.inner.lock();
            inner.timers.drain().collect()
        };
        if !drained.is_empty() {
            warn!(count = drained.len(), "cancelling all muster timers");
        }
        for (_, entry) in drained {
            entry.cancel.cancel();
        }
    }

    /// Whether `key` has a live timer.
    pub fn has_timer(&self, key: &str) -> bool {
        self.inner.lock().timers.contains_key(key)
    }

    /// Number of live timers.
    pub fn timer_count(&self) -> usize {
        self.inner.lock().timers.len()
    }
}
