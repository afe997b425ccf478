//! External metadata store capability.
//!
//! The host adapts whatever key-value metadata API it owns to this narrow
//! interface; engine code never branches on the store's kind. Values are
//! JSON-shaped, and exactly one fixed key carries the whole stroke
//! collection.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Handle for an active change subscription.
pub type SubscriptionId = Uuid;

/// A change notification from the store.
///
/// `key: None` models a notification whose shape the adapter did not
/// recognize; consumers treat it as potentially relevant rather than
/// dropping it.
#[derive(Debug, Clone, Default)]
pub struct ChangeNotice {
    pub key: Option<String>,
}

impl ChangeNotice {
    /// A notification naming the changed key.
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// A notification whose shape could not be interpreted.
    pub fn unrecognized() -> Self {
        Self { key: None }
    }
}

/// Callback invoked for every store change.
pub type ChangeCallback = Box<dyn Fn(&ChangeNotice) + Send + Sync>;

/// Key-value metadata store exposed by the host.
///
/// `get` hands back a value independent of the store's internal state, so
/// callers may mutate it freely. `set` fully replaces the value at `key`
/// (no merge semantics) and notifies subscribers.
pub trait MetadataStore: Send + Sync {
    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Register a change callback.
    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId;

    /// Remove a previously registered callback.
    fn unsubscribe(&self, id: SubscriptionId);
}
