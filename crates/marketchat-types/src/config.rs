//! Configuration types for Marketchat.
//!
//! `ChatConfig` represents the `config.toml` in the data directory. It
//! controls the seed message shown for empty conversations, the optional
//! canned counterpart reply, and the change-event channel capacity.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Placeholder history for conversations with no recorded messages.
    #[serde(default)]
    pub seed: SeedTemplate,

    /// Canned text used when simulating a counterpart reply.
    #[serde(default)]
    pub auto_reply: Option<String>,

    /// Capacity of the broadcast channel carrying change events.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_event_capacity() -> usize {
    256
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            seed: SeedTemplate::default(),
            auto_reply: None,
            event_capacity: default_event_capacity(),
        }
    }
}

impl ChatConfig {
    /// Check values that would make the wiring unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        if let Some(reply) = &self.auto_reply {
            if reply.trim().is_empty() {
                return Err(ConfigError::BlankAutoReply);
            }
        }
        Ok(())
    }
}

/// Fixed content of the seed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTemplate {
    #[serde(default = "default_seed_content")]
    pub content: String,

    #[serde(default = "default_seed_timestamp")]
    pub timestamp: String,
}

fn default_seed_content() -> String {
    "Hi! Thanks for your interest. Feel free to ask me anything about this item.".to_string()
}

fn default_seed_timestamp() -> String {
    "Earlier".to_string()
}

impl Default for SeedTemplate {
    fn default() -> Self {
        Self {
            content: default_seed_content(),
            timestamp: default_seed_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_default_values() {
        let config = ChatConfig::default();
        assert_eq!(config.event_capacity, 256);
        assert!(config.auto_reply.is_none());
        assert_eq!(config.seed, SeedTemplate::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chat_config_deserialize_with_defaults() {
        let config: ChatConfig = toml::from_str("").unwrap();
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn test_chat_config_deserialize_with_values() {
        let toml_str = r#"
auto_reply = "Sure, still available!"
event_capacity = 32

[seed]
content = "Welcome"
"#;
        let config: ChatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.auto_reply.as_deref(), Some("Sure, still available!"));
        assert_eq!(config.event_capacity, 32);
        assert_eq!(config.seed.content, "Welcome");
        assert_eq!(config.seed.timestamp, "Earlier");
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = ChatConfig {
            event_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroEventCapacity));
    }

    #[test]
    fn test_validate_rejects_blank_auto_reply() {
        let config = ChatConfig {
            auto_reply: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BlankAutoReply));
    }
}
