//! Application state for the `mchat` binary.
//!
//! Loads configuration and the last snapshot from the data directory and
//! wires them into an `InboxService`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use marketchat_core::clock::SystemClock;
use marketchat_core::inbox::InboxService;
use marketchat_types::config::ChatConfig;

use crate::config::load_chat_config;
use crate::snapshot_store::{load_snapshot, save_snapshot};

pub struct AppState {
    pub inbox: InboxService,
    pub config: ChatConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load config and the persisted inbox from `data_dir`.
    pub async fn init(data_dir: PathBuf) -> Result<Self> {
        let config = load_chat_config(&data_dir).await;
        let snapshot = load_snapshot(&data_dir).await?;
        let inbox = InboxService::from_snapshot(&config, snapshot, Arc::new(SystemClock))
            .with_context(|| format!("Failed to restore inbox from {}", data_dir.display()))?;

        Ok(Self {
            inbox,
            config,
            data_dir,
        })
    }

    /// Write the current inbox back to disk.
    pub async fn persist(&self) -> Result<()> {
        save_snapshot(&self.data_dir, &self.inbox.snapshot()).await
    }
}
