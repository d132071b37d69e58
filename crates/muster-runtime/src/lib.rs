//! # muster-runtime
//!
//! Orchestration for muster ("come join me") requests.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `config` | Channel name and request timeout configuration |
//! | `traits` | External collaborator seams: transport, presence, push |
//! | `presence` | On-demand presence cache over a `PresenceProvider` |
//! | `dedup` | At-most-one-active-request-per-target guard |
//! | `timers` | Cancellable per-target countdown registry |
//! | `emitter` | Broadcast of `MusterEvent` toward the notification layer |
//! | `dispatcher` | Outbound request orchestration: dedup → presence → send |
//! | `router` | Inbound channel message decoding and self-filtering |
//! | `testutil` | Recording fakes for the collaborator traits |
//!
//! ## Data Flow
//!
//! UI action → `dispatcher` → presence/transport/push → timer start.
//! Inbound transport message → `router` → `emitter` subscribers.
//!
//! ## Concurrency
//!
//! Shared state (active-target set, timer map, presence cache) sits behind
//! `parking_lot` mutexes and is never held across an await. Timer tasks race
//! a `CancellationToken` against the deadline; the fired task claims its
//! registry entry under the lock before the expiry callback runs, so a
//! concurrent cancel produces exactly one outcome.

#![deny(unsafe_code)]

pub mod config;
pub mod dedup;
pub mod dispatcher;
pub mod emitter;
pub mod presence;
pub mod router;
pub mod testutil;
pub mod timers;
pub mod traits;

pub use config::MusterConfig;
pub use dedup::DedupGuard;
pub use dispatcher::{MusterDispatch, RequestDispatcher};
pub use emitter::EventEmitter;
pub use presence::PresenceCache;
pub use router::MessageRouter;
pub use timers::TimerRegistry;
pub use traits::{MusterTransport, PresenceProvider, PushSender};
