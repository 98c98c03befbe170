//! A single-file JSON state store.
//!
//! Persists the connector's two state slots (cursor and lock) in one
//! JSON document so separate CLI invocations — including overlapping
//! cron runs — share state the way host-embedded deployments do.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ordsync_engine::{StateEntry, StateStore, SyncError, SyncResult};

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    value: String,
    updated_at: DateTime<Utc>,
}

/// File-backed [`StateStore`] implementation.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    /// Creates a store at the given path; the file is created on first
    /// write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> SyncResult<BTreeMap<String, StoredEntry>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                SyncError::State(format!("corrupt state file {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(SyncError::State(format!(
                "cannot read state file {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, entries: &BTreeMap<String, StoredEntry>) -> SyncResult<()> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| SyncError::State(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| {
            SyncError::State(format!(
                "cannot write state file {}: {e}",
                self.path.display()
            ))
        })
    }
}

impl StateStore for JsonFileStateStore {
    fn get(&self, key: &str) -> SyncResult<Option<StateEntry>> {
        Ok(self.load()?.get(key).map(|entry| StateEntry {
            value: entry.value.clone(),
            updated_at: entry.updated_at,
        }))
    }

    fn put(&self, key: &str, value: &str) -> SyncResult<()> {
        let mut entries = self.load()?;
        entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordsync_engine::state_keys;

    #[test]
    fn roundtrips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("state.json"));

        assert!(store.get(state_keys::ORDER_LAST_SYNC_AT).unwrap().is_none());
        store
            .put(state_keys::ORDER_LAST_SYNC_AT, "2024-01-05 00:00:00")
            .unwrap();

        // A second store over the same file sees the write
        let other = JsonFileStateStore::new(dir.path().join("state.json"));
        let entry = other.get(state_keys::ORDER_LAST_SYNC_AT).unwrap().unwrap();
        assert_eq!(entry.value, "2024-01-05 00:00:00");
    }

    #[test]
    fn corrupt_file_is_a_state_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStateStore::new(&path);
        assert!(matches!(store.get("k"), Err(SyncError::State(_))));
    }
}
