//! File-based state store
//!
//! One `<connection_id>.json` file per connection, written atomically.

use super::StateStore;
use crate::error::{Error, Result};
use crate::state::ConnectionState;
use crate::types::ConnectionId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk envelope
#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    updated_at: DateTime<Utc>,
    state: ConnectionState,
}

/// State store persisting one JSON file per connection
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            Error::store(format!(
                "Failed to create state directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the state files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the state file for a connection
    pub fn path_for(&self, connection_id: ConnectionId) -> PathBuf {
        self.dir.join(format!("{connection_id}.json"))
    }

    /// Time of the last write for a connection
    pub async fn updated_at(&self, connection_id: ConnectionId) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .read(connection_id)
            .await?
            .map(|stored| stored.updated_at))
    }

    async fn read(&self, connection_id: ConnectionId) -> Result<Option<StoredState>> {
        let path = self.path_for(connection_id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::store(format!("Failed to read state file: {e}"))),
        };

        let stored = serde_json::from_str(&contents)
            .map_err(|e| Error::store(format!("Failed to parse state file: {e}")))?;
        Ok(Some(stored))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get_state(&self, connection_id: ConnectionId) -> Result<Option<ConnectionState>> {
        Ok(self.read(connection_id).await?.map(|stored| stored.state))
    }

    async fn create_or_update_state(
        &self,
        connection_id: ConnectionId,
        state: &ConnectionState,
    ) -> Result<()> {
        let stored = StoredState {
            updated_at: Utc::now(),
            state: state.clone(),
        };
        let contents = serde_json::to_string_pretty(&stored)
            .map_err(|e| Error::store(format!("Failed to serialize state: {e}")))?;

        // Write to temp file first, then rename for atomicity
        let path = self.path_for(connection_id);
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::store(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| Error::store(format!("Failed to rename state file: {e}")))?;

        debug!(path = %path.display(), "State file written");
        Ok(())
    }
}
