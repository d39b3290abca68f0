//! Inbox service coordinating the conversation log and the chat registry.
//!
//! The two containers do not know about each other. InboxService applies
//! a message event in the required order (append to the log, then bump the
//! matching summary), resolves a chat to its conversation through the
//! summary's `listing_id`, and publishes a `ChatEvent` for every change.

use std::sync::Arc;

use marketchat_types::config::ChatConfig;
use marketchat_types::error::SnapshotError;
use marketchat_types::event::ChatEvent;
use marketchat_types::message::{Message, NewMessage, Sender};
use marketchat_types::snapshot::InboxSnapshot;
use marketchat_types::summary::{ChatSummary, ChatSummaryPatch};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::conversation::ConversationLog;
use crate::event::EventBus;
use crate::inbox::registry::ChatRegistry;

/// Coordinates message events across the log and the inbox.
#[derive(Debug, Clone)]
pub struct InboxService {
    log: Arc<ConversationLog>,
    registry: Arc<ChatRegistry>,
    events: EventBus,
    auto_reply: Option<String>,
}

impl InboxService {
    /// Wire a service around existing containers.
    pub fn new(log: Arc<ConversationLog>, registry: Arc<ChatRegistry>, events: EventBus) -> Self {
        Self {
            log,
            registry,
            events,
            auto_reply: None,
        }
    }

    /// Build an empty inbox from configuration, on the system clock.
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            log: Arc::new(ConversationLog::with_seed(config.seed.clone())),
            registry: Arc::new(ChatRegistry::with_clock(Arc::new(SystemClock))),
            events: EventBus::new(config.event_capacity),
            auto_reply: config.auto_reply.clone(),
        }
    }

    /// Rebuild an inbox from a previously exported snapshot.
    ///
    /// Rejects snapshots whose message ids are not `1..=N` per conversation
    /// or whose chat ids repeat.
    pub fn from_snapshot(
        config: &ChatConfig,
        snapshot: InboxSnapshot,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        let log = ConversationLog::from_conversations(config.seed.clone(), snapshot.conversations)?;
        let registry = ChatRegistry::with_summaries(snapshot.chats, clock);
        info!(
            conversations = log.conversation_ids().len(),
            chats = registry.len(),
            "Inbox loaded"
        );

        Ok(Self {
            log: Arc::new(log),
            registry: Arc::new(registry),
            events: EventBus::new(config.event_capacity),
            auto_reply: config.auto_reply.clone(),
        })
    }

    /// Set the canned text used by `simulate_reply`.
    pub fn with_auto_reply(mut self, text: impl Into<String>) -> Self {
        self.auto_reply = Some(text.into());
        self
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn registry(&self) -> &ChatRegistry {
        &self.registry
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: ChatEvent) {
        debug!(
            subject = event.subject(),
            subscribers = self.events.subscriber_count(),
            ?event,
            "Publishing inbox event"
        );
        self.events.publish(event);
    }

    // --- Chat lifecycle ---

    /// Create a chat or merge fields into an existing one.
    pub fn upsert_chat(&self, patch: ChatSummaryPatch) {
        let chat_id = patch.id.clone();
        self.registry.upsert(patch);
        self.publish(ChatEvent::ChatUpserted { chat_id });
    }

    /// Remove a chat from the inbox. Its message history is kept.
    pub fn remove_chat(&self, chat_id: &str) -> bool {
        let removed = self.registry.remove(chat_id);
        if removed {
            self.publish(ChatEvent::ChatRemoved {
                chat_id: chat_id.to_string(),
            });
        }
        removed
    }

    /// Mark a chat as read and return its conversation history.
    ///
    /// Returns `None` for an unknown chat id.
    pub fn open_chat(&self, chat_id: &str) -> Option<Vec<Message>> {
        let Some(summary) = self.registry.get(chat_id) else {
            warn!(chat_id, "Attempted to open non-existent chat");
            return None;
        };

        if self.registry.mark_read(chat_id) {
            self.publish(ChatEvent::ChatRead {
                chat_id: chat_id.to_string(),
            });
        }
        Some(self.log.history(&summary.listing_id))
    }

    // --- Message events ---

    /// Record a message sent by the local user.
    pub fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        display_time: &str,
        image: Option<String>,
    ) -> Option<Message> {
        let message = NewMessage::text(Sender::LocalUser, text, display_time);
        let message = match image {
            Some(image) => message.with_image(image),
            None => message,
        };
        self.deliver(chat_id, message)
    }

    /// Record a message that arrived from the other side.
    pub fn receive_reply(
        &self,
        chat_id: &str,
        sender: Sender,
        text: &str,
        display_time: &str,
    ) -> Option<Message> {
        self.deliver(chat_id, NewMessage::text(sender, text, display_time))
    }

    /// Record the configured canned counterpart reply, if any.
    pub fn simulate_reply(&self, chat_id: &str, display_time: &str) -> Option<Message> {
        let text = self.auto_reply.as_deref()?;
        self.receive_reply(chat_id, Sender::Counterpart, text, display_time)
    }

    fn deliver(&self, chat_id: &str, message: NewMessage) -> Option<Message> {
        let Some(summary) = self.registry.get(chat_id) else {
            warn!(chat_id, "Dropping message for non-existent chat");
            return None;
        };

        let stored = self.log.append(&summary.listing_id, message);
        self.publish(ChatEvent::MessageAppended {
            conversation_id: summary.listing_id.clone(),
            message_id: stored.id,
        });

        match self
            .registry
            .bump_to_top(chat_id, &stored.content, &stored.timestamp)
        {
            Some(unread_count) => {
                self.publish(ChatEvent::ChatBumped {
                    chat_id: chat_id.to_string(),
                    unread_count,
                });
            }
            // Removed between lookup and bump; the message stays in the log.
            None => debug!(chat_id, "Chat removed before bump"),
        }

        Some(stored)
    }

    // --- Reads ---

    /// Inbox rows, most recent first.
    pub fn inbox(&self) -> Vec<ChatSummary> {
        self.registry.list_by_recency()
    }

    /// Total unread messages for the inbox badge.
    pub fn unread_badge(&self) -> u64 {
        self.registry.total_unread()
    }

    /// History of a conversation by listing id.
    pub fn history(&self, conversation_id: &str) -> Vec<Message> {
        self.log.history(conversation_id)
    }

    /// Export both containers.
    pub fn snapshot(&self) -> InboxSnapshot {
        InboxSnapshot {
            conversations: self.log.export(),
            chats: self.registry.export(),
        }
    }
}
