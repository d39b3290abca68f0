//! Change notification for the presentation layer.
//!
//! Provides an `EventBus` that distributes `ChatEvent` messages to all
//! subscribers via a `tokio::sync::broadcast` channel. The log and the
//! registry never publish; only `InboxService` does.

pub mod bus;

pub use bus::EventBus;
