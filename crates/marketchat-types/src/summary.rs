//! Inbox summary types.
//!
//! A `ChatSummary` is the denormalized inbox row for one counterpart /
//! listing pairing. `ChatSummaryPatch` is the partial form accepted by
//! upsert: every field except `id` is optional, and absent fields are
//! left untouched when merged into an existing summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSummary {
    /// Stable identifier of the counterpart/conversation pairing.
    pub id: String,
    pub counterpart_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Conversation key in the message log.
    pub listing_id: String,
    pub listing_title: String,
    pub listing_price: f64,
    pub last_message: String,
    pub last_message_display_time: String,
    /// Precise instant used only for recency ordering.
    pub last_message_instant: DateTime<Utc>,
    pub unread_count: u32,
}

/// Partial update for a `ChatSummary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatSummaryPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_display_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_instant: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<u32>,
}

impl ChatSummaryPatch {
    /// A patch that touches nothing but names the target summary.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn counterpart_name(mut self, name: impl Into<String>) -> Self {
        self.counterpart_name = Some(name.into());
        self
    }

    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Set the full listing context in one call.
    pub fn listing(
        mut self,
        listing_id: impl Into<String>,
        title: impl Into<String>,
        price: f64,
    ) -> Self {
        self.listing_id = Some(listing_id.into());
        self.listing_title = Some(title.into());
        self.listing_price = Some(price);
        self
    }

    pub fn last_message(mut self, text: impl Into<String>, display_time: impl Into<String>) -> Self {
        self.last_message = Some(text.into());
        self.last_message_display_time = Some(display_time.into());
        self
    }

    pub fn last_message_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.last_message_instant = Some(instant);
        self
    }

    pub fn unread_count(mut self, count: u32) -> Self {
        self.unread_count = Some(count);
        self
    }

    /// Overwrite every field of `target` that this patch carries.
    ///
    /// `id` is never touched.
    pub fn merge_into(self, target: &mut ChatSummary) {
        if let Some(v) = self.counterpart_name {
            target.counterpart_name = v;
        }
        if let Some(v) = self.avatar {
            target.avatar = Some(v);
        }
        if let Some(v) = self.listing_id {
            target.listing_id = v;
        }
        if let Some(v) = self.listing_title {
            target.listing_title = v;
        }
        if let Some(v) = self.listing_price {
            target.listing_price = v;
        }
        if let Some(v) = self.last_message {
            target.last_message = v;
        }
        if let Some(v) = self.last_message_display_time {
            target.last_message_display_time = v;
        }
        if let Some(v) = self.last_message_instant {
            target.last_message_instant = v;
        }
        if let Some(v) = self.unread_count {
            target.unread_count = v;
        }
    }

    /// Materialize a new summary. Absent fields take empty/zero defaults;
    /// an absent instant becomes `now`.
    pub fn into_summary(self, now: DateTime<Utc>) -> ChatSummary {
        ChatSummary {
            id: self.id,
            counterpart_name: self.counterpart_name.unwrap_or_default(),
            avatar: self.avatar,
            listing_id: self.listing_id.unwrap_or_default(),
            listing_title: self.listing_title.unwrap_or_default(),
            listing_price: self.listing_price.unwrap_or_default(),
            last_message: self.last_message.unwrap_or_default(),
            last_message_display_time: self.last_message_display_time.unwrap_or_default(),
            last_message_instant: self.last_message_instant.unwrap_or(now),
            unread_count: self.unread_count.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ChatSummary {
        ChatSummary {
            id: "c1".to_string(),
            counterpart_name: "Alice".to_string(),
            avatar: None,
            listing_id: "L-100".to_string(),
            listing_title: "Road bike".to_string(),
            listing_price: 250.0,
            last_message: "hi".to_string(),
            last_message_display_time: "09:00".to_string(),
            last_message_instant: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
            unread_count: 3,
        }
    }

    #[test]
    fn test_merge_only_overwrites_present_fields() {
        let mut summary = sample();
        ChatSummaryPatch::new("c1")
            .counterpart_name("Bob")
            .merge_into(&mut summary);

        assert_eq!(summary.counterpart_name, "Bob");
        assert_eq!(summary.unread_count, 3);
        assert_eq!(summary.last_message, "hi");
        assert_eq!(summary.listing_title, "Road bike");
    }

    #[test]
    fn test_merge_never_changes_id() {
        let mut summary = sample();
        let mut patch = ChatSummaryPatch::new("other");
        patch.unread_count = Some(0);
        patch.merge_into(&mut summary);
        assert_eq!(summary.id, "c1");
        assert_eq!(summary.unread_count, 0);
    }

    #[test]
    fn test_into_summary_defaults() {
        let now = Utc.with_ymd_and_hms(2026, 5, 5, 12, 0, 0).unwrap();
        let summary = ChatSummaryPatch::new("c9")
            .listing("L-1", "Lamp", 12.5)
            .into_summary(now);

        assert_eq!(summary.id, "c9");
        assert_eq!(summary.counterpart_name, "");
        assert_eq!(summary.listing_price, 12.5);
        assert_eq!(summary.last_message_instant, now);
        assert_eq!(summary.unread_count, 0);
    }

    #[test]
    fn test_patch_deserializes_from_sparse_json() {
        let patch: ChatSummaryPatch =
            serde_json::from_str(r#"{"id":"c1","counterpart_name":"Bob"}"#).unwrap();
        assert_eq!(patch, ChatSummaryPatch::new("c1").counterpart_name("Bob"));
    }
}
