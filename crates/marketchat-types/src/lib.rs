//! Shared domain types for Marketchat.
//!
//! This crate contains the types exchanged between the conversation log,
//! the inbox registry, and the application layer: messages, chat summaries,
//! change events, configuration, and snapshots.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod snapshot;
pub mod summary;
