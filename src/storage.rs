//! Persisted snapshot storage
//!
//! The engine treats storage as a best-effort, single-owner key/value
//! target: writes are last-write-wins and never awaited for acknowledgment,
//! reads happen once at startup. A storage error is logged by the caller
//! and treated as "no snapshot"; it must never take the engine down.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::model::PersistedSnapshot;

/// Key/value persistence for filter snapshots.
pub trait SnapshotStorage: Send + Sync {
    /// Read the snapshot stored under `key`, `None` when absent.
    fn read(&self, key: &str) -> Result<Option<PersistedSnapshot>>;

    /// Overwrite the snapshot stored under `key`.
    fn write(&self, key: &str, snapshot: &PersistedSnapshot) -> Result<()>;
}

/// In-process storage for tests and ephemeral sessions.
///
/// Stores serialized JSON rather than live structs so that it exercises the
/// same wire format as durable backends.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<PersistedSnapshot>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(raw) => {
                let snapshot = serde_json::from_str(raw)
                    .with_context(|| format!("corrupt snapshot under key '{key}'"))?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, snapshot: &PersistedSnapshot) -> Result<()> {
        let raw = serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;
        self.entries.lock().unwrap().insert(key.to_string(), raw);
        Ok(())
    }
}

/// One JSON file per key under a root directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<PersistedSnapshot>> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        let snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("corrupt snapshot file {}", path.display()))?;
        Ok(Some(snapshot))
    }

    fn write(&self, key: &str, snapshot: &PersistedSnapshot) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        let path = self.path_for(key);
        let raw =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
        fs::write(&path, raw).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
