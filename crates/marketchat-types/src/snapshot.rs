//! Serializable snapshot of the conversation log and the inbox registry.
//!
//! Persistence is layered outside the core: callers export a snapshot,
//! write it wherever they like, and rebuild instances from it later.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::message::Message;
use crate::summary::ChatSummary;

/// Point-in-time copy of all conversations and chat summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboxSnapshot {
    /// Conversation id -> ordered messages.
    #[serde(default)]
    pub conversations: BTreeMap<String, Vec<Message>>,

    /// Chat summaries, sorted by id.
    #[serde(default)]
    pub chats: Vec<ChatSummary>,
}

impl InboxSnapshot {
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty() && self.chats.is_empty()
    }

    /// Check that every conversation numbers its messages `1..=N` and that
    /// no chat id repeats.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (conversation_id, messages) in &self.conversations {
            check_sequence(conversation_id, messages)?;
        }

        let mut seen = HashSet::new();
        for chat in &self.chats {
            if !seen.insert(chat.id.as_str()) {
                return Err(SnapshotError::DuplicateChat(chat.id.clone()));
            }
        }
        Ok(())
    }
}

/// Check that `messages` carries ids exactly `1..=len` in order.
pub fn check_sequence(conversation_id: &str, messages: &[Message]) -> Result<(), SnapshotError> {
    for (index, message) in messages.iter().enumerate() {
        let expected = index as u64 + 1;
        if message.id != expected {
            return Err(SnapshotError::NonContiguousIds {
                conversation_id: conversation_id.to_string(),
                expected,
                found: message.id,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{NewMessage, Sender};
    use crate::summary::ChatSummaryPatch;
    use chrono::Utc;

    fn messages(ids: &[u64]) -> Vec<Message> {
        ids.iter()
            .map(|&id| NewMessage::text(Sender::Counterpart, "hi", "09:00").into_message(id))
            .collect()
    }

    #[test]
    fn test_empty_snapshot_from_empty_json() {
        let snapshot: InboxSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_contiguous_sequence_is_valid() {
        assert!(check_sequence("L-1", &messages(&[1, 2, 3])).is_ok());
        assert!(check_sequence("L-1", &[]).is_ok());
    }

    #[test]
    fn test_sequence_with_gap_is_rejected() {
        let err = check_sequence("L-1", &messages(&[2, 3])).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::NonContiguousIds {
                conversation_id: "L-1".to_string(),
                expected: 1,
                found: 2,
            }
        );
    }

    #[test]
    fn test_sequence_with_repeat_is_rejected() {
        let err = check_sequence("L-1", &messages(&[1, 2, 2])).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::NonContiguousIds {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_chat_is_rejected() {
        let chat = ChatSummaryPatch::new("c1").into_summary(Utc::now());
        let snapshot = InboxSnapshot {
            conversations: BTreeMap::new(),
            chats: vec![chat.clone(), chat],
        };
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotError::DuplicateChat("c1".to_string()))
        );
    }
}
