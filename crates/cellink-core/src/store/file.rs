//! File-backed metadata store implementation.
//!
//! Persists the whole key-value map as one JSON file. Every `get` goes
//! back to disk, so writes made through another handle to the same file
//! are observed on the next read.

use super::{ChangeCallback, ChangeNotice, MetadataStore, StoreError, StoreResult, SubscriptionId};
use log::warn;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use uuid::Uuid;

/// Metadata store backed by a single JSON file.
pub struct FileStore {
    /// Path of the backing file. Created on first write.
    path: PathBuf,
    subscribers: RwLock<Vec<(SubscriptionId, ChangeCallback)>>,
}

impl FileStore {
    /// Open a store at the given file path.
    ///
    /// Creates the parent directory if it doesn't exist; the file itself
    /// appears on the first write.
    pub fn new(path: PathBuf) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Io(format!("Failed to create store directory: {}", e))
                })?;
            }
        }
        Ok(Self {
            path,
            subscribers: RwLock::new(Vec::new()),
        })
    }

    /// Get the backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_map(&self) -> HashMap<String, Value> {
        let Ok(json) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!("Ignoring unreadable store file {}: {}", self.path.display(), e);
            HashMap::new()
        })
    }

    fn notify(&self, key: &str) {
        let notice = ChangeNotice::for_key(key);
        if let Ok(subscribers) = self.subscribers.read() {
            for (_, callback) in subscribers.iter() {
                callback(&notice);
            }
        }
    }
}

impl MetadataStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.read_map().remove(key)
    }

    fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let mut map = self.read_map();
        map.insert(key.to_string(), value);
        let json = serde_json::to_string_pretty(&map)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| {
            StoreError::Io(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        self.notify(key);
        Ok(())
    }

    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId {
        let id = Uuid::new_v4();
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.push((id, callback));
        }
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.retain(|(subscription, _)| *subscription != id);
        }
    }
}
