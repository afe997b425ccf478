//! In-memory metadata store implementation.

use super::{ChangeCallback, ChangeNotice, MetadataStore, StoreError, StoreResult, SubscriptionId};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory store for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
    subscribers: RwLock<Vec<(SubscriptionId, ChangeCallback)>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
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

impl MetadataStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        {
            let mut values = self
                .values
                .write()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            values.insert(key.to_string(), value);
        }
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
