//! Message types for listing-level conversations.
//!
//! A conversation is keyed by its listing identifier and holds an ordered
//! sequence of `Message` values whose ids run `1..=N` with no gaps.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The signed-in user of this session.
    LocalUser,
    /// The other party of the conversation (buyer or seller).
    Counterpart,
    /// Automated assistant messages (canned replies, system notices).
    AutomatedAssistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::LocalUser => write!(f, "local_user"),
            Sender::Counterpart => write!(f, "counterpart"),
            Sender::AutomatedAssistant => write!(f, "automated_assistant"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local_user" | "user" | "me" => Ok(Sender::LocalUser),
            "counterpart" | "seller" | "buyer" => Ok(Sender::Counterpart),
            "automated_assistant" | "assistant" | "bot" => Ok(Sender::AutomatedAssistant),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A stored message within a conversation.
///
/// `id` is assigned by the conversation log and is never reused.
/// `timestamp` is a caller-supplied display string; it is not parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub content: String,
    pub timestamp: String,
    /// Opaque attachment reference (URL, storage key, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A message as supplied by the caller, before the log assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub sender: Sender,
    pub content: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewMessage {
    /// Build a text-only message.
    pub fn text(sender: Sender, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp: timestamp.into(),
            image: None,
        }
    }

    /// Attach an image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Turn this into a stored message with the given sequence id.
    pub fn into_message(self, id: u64) -> Message {
        Message {
            id,
            sender: self.sender,
            content: self.content,
            timestamp: self.timestamp,
            image: self.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display_parse_roundtrip() {
        for sender in [
            Sender::LocalUser,
            Sender::Counterpart,
            Sender::AutomatedAssistant,
        ] {
            let parsed: Sender = sender.to_string().parse().unwrap();
            assert_eq!(sender, parsed);
        }
    }

    #[test]
    fn test_sender_parse_aliases() {
        assert_eq!("Seller".parse::<Sender>().unwrap(), Sender::Counterpart);
        assert_eq!("me".parse::<Sender>().unwrap(), Sender::LocalUser);
        assert!("nobody".parse::<Sender>().is_err());
    }

    #[test]
    fn test_sender_serde() {
        let json = serde_json::to_string(&Sender::AutomatedAssistant).unwrap();
        assert_eq!(json, "\"automated_assistant\"");
    }

    #[test]
    fn test_new_message_into_message() {
        let msg = NewMessage::text(Sender::LocalUser, "Is it still available?", "10:42")
            .with_image("img/bike.jpg")
            .into_message(7);
        assert_eq!(msg.id, 7);
        assert_eq!(msg.sender, Sender::LocalUser);
        assert_eq!(msg.image.as_deref(), Some("img/bike.jpg"));
    }

    #[test]
    fn test_message_without_image_omits_field() {
        let msg = NewMessage::text(Sender::Counterpart, "", "now").into_message(1);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("image"));
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
