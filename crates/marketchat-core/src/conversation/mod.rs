//! Per-listing message history.
//!
//! `ConversationLog` owns the append-only message sequence for each
//! conversation. Empty conversations read back as a single seed message
//! produced by the pure `seed_for` function.

pub mod log;
pub mod seed;

pub use log::ConversationLog;
pub use seed::seed_for;
