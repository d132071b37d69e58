//! # muster-core
//!
//! Foundation types for the muster ("come join me") request orchestrator.
//!
//! This crate provides the shared vocabulary that the runtime and delivery
//! crates depend on:
//!
//! - **Identity**: [`identity::UserIdentity`] and [`identity::LocalIdentity`]
//! - **Wire codec**: [`wire::MusterMessage`] tagged union with lenient decode
//! - **Events**: [`events::MusterEvent`] emitted toward the notification layer
//! - **Scenes**: [`scene::SceneName`] catalog and display-label mapping
//! - **Errors**: `thiserror` hierarchy in [`errors`]
//! - **Text**: char-safe nickname truncation in [`text`]
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `muster-runtime` and `muster-push`.

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod identity;
pub mod logging;
pub mod scene;
pub mod text;
pub mod wire;
