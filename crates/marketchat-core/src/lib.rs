//! Conversation and inbox state management for Marketchat.
//!
//! Two independent containers live here: `ConversationLog` (per-listing
//! message history) and `ChatRegistry` (the inbox projection). They share
//! no storage. `InboxService` is the coordinator that applies a message
//! event to both in the right order and publishes change events.
//!
//! Nothing in this crate performs I/O.

pub mod clock;
pub mod conversation;
pub mod event;
pub mod inbox;
