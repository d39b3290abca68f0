//! Seed message for conversations with no recorded history.

use marketchat_types::config::SeedTemplate;
use marketchat_types::message::{Message, Sender};

/// Id of the seed message. Always the first entry of a conversation.
pub const SEED_MESSAGE_ID: u64 = 1;

/// Build the placeholder message for `conversation_id`.
///
/// Pure: the same template yields a content-identical message on every
/// call, and nothing is stored.
pub fn seed_for(template: &SeedTemplate, _conversation_id: &str) -> Message {
    Message {
        id: SEED_MESSAGE_ID,
        sender: Sender::Counterpart,
        content: template.content.clone(),
        timestamp: template.timestamp.clone(),
        image: None,
    }
}
