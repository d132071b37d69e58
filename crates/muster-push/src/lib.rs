//! # muster-push
//!
//! HTTP client delivering the offline push-notification fallback: when a
//! muster target is not connected to the real-time channel, the backend
//! notification API relays the request to the target's device instead.
//!
//! Implements [`muster_runtime::PushSender`] for the orchestrator.

#![deny(unsafe_code)]

mod config;
mod service;

pub use config::PushConfig;
pub use service::HttpPushClient;
