//! Unique-by-id set of chat summaries with recency ordering computed on read.
//!
//! Storage is an unordered `DashMap`; "move to top" is realized only by
//! updating `last_message_instant`, and `list_by_recency` sorts on every
//! call. Mutators on an unknown id are no-ops, never errors.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use marketchat_types::summary::{ChatSummary, ChatSummaryPatch};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};

/// The inbox: one `ChatSummary` per chat id.
pub struct ChatRegistry {
    chats: DashMap<String, ChatSummary>,
    clock: Arc<dyn Clock>,
}

impl ChatRegistry {
    /// Create an empty registry on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty registry with a custom time source.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            chats: DashMap::new(),
            clock,
        }
    }

    /// Create a registry pre-populated with `summaries`.
    ///
    /// Later entries win when ids repeat; each replacement is logged.
    pub fn with_summaries(
        summaries: impl IntoIterator<Item = ChatSummary>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let chats = DashMap::new();
        for summary in summaries {
            if let Some(previous) = chats.insert(summary.id.clone(), summary) {
                warn!(chat_id = %previous.id, "Duplicate chat summary replaced an earlier entry");
            }
        }
        Self { chats, clock }
    }

    /// Insert a new summary or merge `patch` into the existing one.
    ///
    /// Merge overwrites only the fields the patch carries. `unread_count`
    /// changes only if the patch sets it.
    pub fn upsert(&self, patch: ChatSummaryPatch) {
        match self.chats.entry(patch.id.clone()) {
            Entry::Occupied(mut existing) => {
                debug!(chat_id = %patch.id, "Merging chat summary");
                patch.merge_into(existing.get_mut());
            }
            Entry::Vacant(slot) => {
                debug!(chat_id = %patch.id, "Inserting chat summary");
                slot.insert(patch.into_summary(self.clock.now()));
            }
        }
    }

    /// Record a new message on a chat: update its last message, stamp it
    /// with the current instant, and increment its unread count.
    ///
    /// Returns the new unread count, or `None` if the id is unknown (in
    /// which case nothing changes).
    pub fn bump_to_top(&self, id: &str, text: &str, display_time: &str) -> Option<u32> {
        let mut summary = self.chats.get_mut(id)?;
        summary.last_message = text.to_string();
        summary.last_message_display_time = display_time.to_string();
        summary.last_message_instant = self.clock.now();
        summary.unread_count = summary.unread_count.saturating_add(1);
        debug!(chat_id = id, unread = summary.unread_count, "Chat bumped to top");
        Some(summary.unread_count)
    }

    /// Reset a chat's unread count. Returns whether the id existed.
    pub fn mark_read(&self, id: &str) -> bool {
        match self.chats.get_mut(id) {
            Some(mut summary) => {
                summary.unread_count = 0;
                true
            }
            None => false,
        }
    }

    /// Delete a chat. Returns whether the id existed.
    pub fn remove(&self, id: &str) -> bool {
        self.chats.remove(id).is_some()
    }

    /// Cloned summary for `id`.
    pub fn get(&self, id: &str) -> Option<ChatSummary> {
        self.chats.get(id).map(|r| r.value().clone())
    }

    /// All summaries, most recent message first.
    ///
    /// Equal instants are ordered by id ascending.
    pub fn list_by_recency(&self) -> Vec<ChatSummary> {
        let mut chats: Vec<ChatSummary> = self.chats.iter().map(|r| r.value().clone()).collect();
        chats.sort_by(|a, b| {
            b.last_message_instant
                .cmp(&a.last_message_instant)
                .then_with(|| a.id.cmp(&b.id))
        });
        chats
    }

    /// Sum of unread counts across all chats.
    pub fn total_unread(&self) -> u64 {
        self.chats
            .iter()
            .map(|r| u64::from(r.value().unread_count))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Copy of every summary, sorted by id.
    pub fn export(&self) -> Vec<ChatSummary> {
        let mut chats: Vec<ChatSummary> = self.chats.iter().map(|r| r.value().clone()).collect();
        chats.sort_by(|a, b| a.id.cmp(&b.id));
        chats
    }
}

impl Default for ChatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRegistry")
            .field("chats", &self.chats.len())
            .finish()
    }
}
