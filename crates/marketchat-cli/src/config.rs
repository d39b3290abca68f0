//! Configuration loader for the `mchat` binary.
//!
//! Reads `config.toml` from the data directory (`~/.marketchat/` by default)
//! and deserializes it into [`ChatConfig`]. Falls back to defaults when the
//! file is missing, malformed, or fails validation.

use std::path::{Path, PathBuf};

use marketchat_types::config::ChatConfig;

/// Resolve the data directory.
///
/// Priority: explicit override, `MARKETCHAT_DATA_DIR`, `~/.marketchat`,
/// then `./.marketchat` as a last resort.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Ok(dir) = std::env::var("MARKETCHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".marketchat");
    }
    PathBuf::from(".marketchat")
}

/// Load configuration from `{data_dir}/config.toml`.
pub async fn load_chat_config(data_dir: &Path) -> ChatConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ChatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ChatConfig::default();
        }
    };

    let config = match toml::from_str::<ChatConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
            return ChatConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            tracing::warn!("Invalid {}: {err}, using defaults", config_path.display());
            ChatConfig::default()
        }
    }
}
