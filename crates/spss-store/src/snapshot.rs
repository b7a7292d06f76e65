//! Snapshot file for the in-process backends
//!
//! A single JSON file holds every collection and every account, so a CLI run
//! can pick up where the last one stopped.

use crate::error::StoreError;
use crate::identity::{Account, MemoryIdentityProvider};
use crate::memory::{Collections, MemoryStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Serialized state of a [`MemoryStore`] and a [`MemoryIdentityProvider`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Collection name -> document id -> body
    pub collections: Collections,
    /// Identity provider accounts
    pub accounts: Vec<Account>,
}

impl Snapshot {
    /// Capture current backend state
    #[must_use]
    pub fn capture(store: &MemoryStore, identity: &MemoryIdentityProvider) -> Self {
        Self {
            collections: store.export(),
            accounts: identity.accounts(),
        }
    }

    /// Build backends from this snapshot
    #[must_use]
    pub fn restore(self) -> (MemoryStore, MemoryIdentityProvider) {
        (
            MemoryStore::from_collections(self.collections),
            MemoryIdentityProvider::from_accounts(self.accounts),
        )
    }

    /// Load snapshot from disk; a missing file yields an empty snapshot
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the file cannot be read and
    /// `StoreError::Serialization` if it is not a snapshot
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let snapshot: Self = serde_json::from_slice(&bytes)?;
                debug!(path = %path.display(), accounts = snapshot.accounts.len(), "snapshot loaded");
                Ok(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }

    /// Write snapshot to disk, creating parent directories
    ///
    /// # Errors
    /// Returns `StoreError::Io` on write failure
    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io_error(parent, e))?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| StoreError::io_error(path, e))?;
        info!(path = %path.display(), "snapshot saved");
        Ok(())
    }
}
