use thiserror::Error;

/// Errors raised while validating configuration.
///
/// The conversation log and the registry themselves never fail; only the
/// surrounding wiring can be misconfigured.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("event_capacity must be greater than zero")]
    ZeroEventCapacity,

    #[error("auto_reply must not be blank when set")]
    BlankAutoReply,
}

/// Errors raised while restoring a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("conversation '{conversation_id}': expected message id {expected}, found {found}")]
    NonContiguousIds {
        conversation_id: String,
        expected: u64,
        found: u64,
    },

    #[error("chat '{0}' appears more than once")]
    DuplicateChat(String),
}
