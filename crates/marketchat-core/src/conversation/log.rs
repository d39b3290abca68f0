//! Append-only message log keyed by conversation (listing) id.
//!
//! Backed by a `DashMap`. `append` holds the entry's shard guard while it
//! computes the next id, so concurrent appenders to the same conversation
//! are serialized and ids stay `1..=N` without gaps. Reads clone the
//! sequence so no guard outlives the call.

use std::collections::BTreeMap;

use dashmap::DashMap;
use marketchat_types::config::SeedTemplate;
use marketchat_types::error::SnapshotError;
use marketchat_types::message::{Message, NewMessage};
use marketchat_types::snapshot::check_sequence;
use tracing::debug;

use super::seed::seed_for;

/// Ordered message history for every conversation.
#[derive(Debug, Default)]
pub struct ConversationLog {
    conversations: DashMap<String, Vec<Message>>,
    seed: SeedTemplate,
}

impl ConversationLog {
    /// Create an empty log with the default seed message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log with a custom seed message.
    pub fn with_seed(seed: SeedTemplate) -> Self {
        Self {
            conversations: DashMap::new(),
            seed,
        }
    }

    /// Rebuild a log from previously exported conversations.
    ///
    /// Every sequence must carry ids exactly `1..=N`; otherwise the next
    /// `append` could reuse an id. Empty sequences are dropped.
    pub fn from_conversations(
        seed: SeedTemplate,
        conversations: impl IntoIterator<Item = (String, Vec<Message>)>,
    ) -> Result<Self, SnapshotError> {
        let restored = DashMap::new();
        for (conversation_id, messages) in conversations {
            if messages.is_empty() {
                continue;
            }
            check_sequence(&conversation_id, &messages)?;
            restored.insert(conversation_id, messages);
        }

        Ok(Self {
            conversations: restored,
            seed,
        })
    }

    /// The seed template used for empty conversations.
    pub fn seed_template(&self) -> &SeedTemplate {
        &self.seed
    }

    /// Append a message and return it with its assigned id.
    ///
    /// The first append to a never-touched conversation materializes the
    /// seed message (id 1) before appending, so the new message gets id 2.
    pub fn append(&self, conversation_id: &str, message: NewMessage) -> Message {
        let mut entry = self
            .conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| vec![seed_for(&self.seed, conversation_id)]);

        let id = entry.len() as u64 + 1;
        let stored = message.into_message(id);
        entry.push(stored.clone());

        debug!(
            conversation_id,
            message_id = id,
            sender = %stored.sender,
            "Message appended"
        );
        stored
    }

    /// Ordered history of a conversation.
    ///
    /// A never-touched conversation yields a freshly built seed message on
    /// every call; nothing is stored.
    pub fn history(&self, conversation_id: &str) -> Vec<Message> {
        match self.conversations.get(conversation_id) {
            Some(messages) => messages.value().clone(),
            None => vec![seed_for(&self.seed, conversation_id)],
        }
    }

    /// Whether any message has been recorded for this conversation.
    pub fn contains(&self, conversation_id: &str) -> bool {
        self.conversations.contains_key(conversation_id)
    }

    /// Number of stored messages (0 for a never-touched conversation).
    pub fn message_count(&self, conversation_id: &str) -> usize {
        self.conversations
            .get(conversation_id)
            .map(|messages| messages.len())
            .unwrap_or(0)
    }

    /// Ids of all conversations with recorded messages, sorted.
    pub fn conversation_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .conversations
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }

    /// Copy of every recorded conversation.
    pub fn export(&self) -> BTreeMap<String, Vec<Message>> {
        self.conversations
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketchat_types::message::Sender;
    use std::sync::Arc;

    fn msg(text: &str) -> NewMessage {
        NewMessage::text(Sender::LocalUser, text, "10:00")
    }

    #[test]
    fn history_of_unknown_conversation_is_seed() {
        let log = ConversationLog::new();
        let history = log.history("L-1");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, 1);
        assert_eq!(history[0].sender, Sender::Counterpart);
        assert!(!log.contains("L-1"));
    }

    #[test]
    fn seed_is_regenerated_not_persisted() {
        let log = ConversationLog::new();
        let first = log.history("L-1");
        let second = log.history("L-1");

        // Content-identical, but reading did not create an entry.
        assert_eq!(first[0].content, second[0].content);
        assert_eq!(first[0].sender, second[0].sender);
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(log.message_count("L-1"), 0);
        assert!(log.conversation_ids().is_empty());
    }

    #[test]
    fn first_append_materializes_seed() {
        let log = ConversationLog::new();
        let stored = log.append("L-1", msg("Is this available?"));

        assert_eq!(stored.id, 2);
        assert_eq!(stored.content, "Is this available?");

        let history = log.history("L-1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], seed_for(log.seed_template(), "L-1"));
        assert_eq!(history[1], stored);
    }

    #[test]
    fn ids_are_contiguous_in_insertion_order() {
        let log = ConversationLog::new();
        for i in 0..5 {
            log.append("L-1", msg(&format!("m{i}")));
        }

        let history = log.history("L-1");
        let ids: Vec<u64> = history.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(history[5].content, "m4");
    }

    #[test]
    fn conversations_are_independent() {
        let log = ConversationLog::new();
        log.append("L-1", msg("a"));
        log.append("L-1", msg("b"));
        let other = log.append("L-2", msg("c"));

        assert_eq!(other.id, 2);
        assert_eq!(log.message_count("L-1"), 3);
        assert_eq!(log.message_count("L-2"), 2);
        assert_eq!(log.conversation_ids(), vec!["L-1", "L-2"]);
    }

    #[test]
    fn empty_content_is_stored_as_given() {
        let log = ConversationLog::new();
        let stored = log.append("L-1", NewMessage::text(Sender::Counterpart, "", ""));
        assert_eq!(stored.content, "");
        assert_eq!(log.history("L-1")[1].content, "");
    }

    #[test]
    fn custom_seed_template_is_used() {
        let log = ConversationLog::with_seed(SeedTemplate {
            content: "Hello there".to_string(),
            timestamp: "Mon".to_string(),
        });
        assert_eq!(log.history("L-9")[0].content, "Hello there");
        assert_eq!(log.history("L-9")[0].timestamp, "Mon");
    }

    #[test]
    fn export_and_restore() {
        let log = ConversationLog::new();
        log.append("L-1", msg("a"));
        log.append("L-2", msg("b"));

        let exported = log.export();
        let restored =
            ConversationLog::from_conversations(SeedTemplate::default(), exported.clone())
                .unwrap();
        assert_eq!(restored.export(), exported);

        let next = restored.append("L-1", msg("c"));
        assert_eq!(next.id, 3);
    }

    #[test]
    fn restore_skips_empty_sequences() {
        let restored = ConversationLog::from_conversations(
            SeedTemplate::default(),
            vec![("L-1".to_string(), Vec::new())],
        )
        .unwrap();
        assert!(!restored.contains("L-1"));
        assert_eq!(restored.history("L-1").len(), 1);
    }

    #[test]
    fn restore_rejects_sequence_with_gap() {
        let messages = vec![
            NewMessage::text(Sender::Counterpart, "a", "09:00").into_message(2),
            NewMessage::text(Sender::LocalUser, "b", "09:01").into_message(3),
        ];
        let err = ConversationLog::from_conversations(
            SeedTemplate::default(),
            vec![("L-1".to_string(), messages)],
        )
        .unwrap_err();

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
    fn restore_rejects_repeated_id() {
        let messages = vec![
            NewMessage::text(Sender::Counterpart, "a", "09:00").into_message(1),
            NewMessage::text(Sender::LocalUser, "b", "09:01").into_message(1),
        ];
        let result = ConversationLog::from_conversations(
            SeedTemplate::default(),
            vec![("L-1".to_string(), messages)],
        );
        assert!(matches!(
            result,
            Err(SnapshotError::NonContiguousIds { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn concurrent_appends_to_same_conversation_keep_ids_contiguous() {
        let log = Arc::new(ConversationLog::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        log.append("L-1", msg(&format!("t{t}-{i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let ids: Vec<u64> = log.history("L-1").iter().map(|m| m.id).collect();
        let expected: Vec<u64> = (1..=201).collect();
        assert_eq!(ids, expected);
    }
}
