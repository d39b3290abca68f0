//! Change events published by the inbox coordinator.
//!
//! `ChatEvent` is what the presentation layer subscribes to in order to
//! re-render. All variants are Clone + Send + Sync for use with tokio
//! broadcast channels.

use serde::{Deserialize, Serialize};

/// A state change in the conversation log or the inbox registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was appended to a conversation.
    MessageAppended {
        conversation_id: String,
        message_id: u64,
    },

    /// A chat summary was inserted or merged.
    ChatUpserted { chat_id: String },

    /// A chat summary received a new message and moved to the top.
    ChatBumped { chat_id: String, unread_count: u32 },

    /// A chat summary was marked as read.
    ChatRead { chat_id: String },

    /// A chat summary was removed.
    ChatRemoved { chat_id: String },
}

impl ChatEvent {
    /// The chat or conversation identifier this event concerns.
    pub fn subject(&self) -> &str {
        match self {
            ChatEvent::MessageAppended {
                conversation_id, ..
            } => conversation_id,
            ChatEvent::ChatUpserted { chat_id }
            | ChatEvent::ChatBumped { chat_id, .. }
            | ChatEvent::ChatRead { chat_id }
            | ChatEvent::ChatRemoved { chat_id } => chat_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_tagging() {
        let event = ChatEvent::ChatBumped {
            chat_id: "c1".to_string(),
            unread_count: 2,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"chat_bumped\""));
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_event_subject() {
        let event = ChatEvent::MessageAppended {
            conversation_id: "L-1".to_string(),
            message_id: 4,
        };
        assert_eq!(event.subject(), "L-1");
        assert_eq!(
            ChatEvent::ChatRemoved {
                chat_id: "c2".to_string()
            }
            .subject(),
            "c2"
        );
    }
}
