//! JSON snapshot persistence for the inbox between CLI invocations.
//!
//! The core keeps state only for the process lifetime; the CLI exports an
//! `InboxSnapshot` after every mutating command and reloads it on start.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use marketchat_types::snapshot::InboxSnapshot;

const SNAPSHOT_FILE: &str = "inbox.json";

pub fn snapshot_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SNAPSHOT_FILE)
}

/// Load the snapshot. A missing file is an empty inbox; a corrupt or
/// inconsistent one is an error so that it is never silently overwritten.
pub async fn load_snapshot(data_dir: &Path) -> Result<InboxSnapshot> {
    let path = snapshot_path(data_dir);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No snapshot at {}, starting empty", path.display());
            return Ok(InboxSnapshot::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let snapshot: InboxSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Corrupt snapshot {}", path.display()))?;
    snapshot
        .validate()
        .with_context(|| format!("Inconsistent snapshot {}", path.display()))?;
    Ok(snapshot)
}

/// Write the snapshot, creating the data directory if needed.
///
/// Writes to a sibling temp file first and renames it into place.
pub async fn save_snapshot(data_dir: &Path, snapshot: &InboxSnapshot) -> Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let path = snapshot_path(data_dir);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(snapshot)?;

    tokio::fs::write(&tmp, json)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, &path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    tracing::debug!(chats = snapshot.chats.len(), "Snapshot saved to {}", path.display());
    Ok(())
}
