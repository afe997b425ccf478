//! Metadata synchronizer: read-modify-write bridge to the external store.

use crate::store::{ChangeNotice, MetadataStore, StoreError, StoreResult};
use crate::stroke::{OverlayDocument, OVERLAY_KEY};
use log::warn;
use std::sync::Arc;

/// Bridges stroke operations to the external metadata store.
///
/// The stroke collection is never cached here: every mutation re-reads the
/// stored value and writes the full replacement back, so independent
/// surfaces sharing one store don't clobber each other with stale copies.
/// Two actors racing between one actor's read and write still resolve
/// last-writer-wins; the store's own concurrency semantics are the only
/// arbiter, and this layer does not add conflict detection.
#[derive(Clone)]
pub struct OverlaySync {
    store: Arc<dyn MetadataStore>,
}

impl OverlaySync {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Fetch the current stroke collection.
    ///
    /// Absent or malformed values yield an empty collection; this never
    /// fails. Deserializing the store's value produces an independent deep
    /// copy, so callers may mutate the result freely.
    pub fn read(&self) -> OverlayDocument {
        let Some(value) = self.store.get(OVERLAY_KEY) else {
            return OverlayDocument::new();
        };
        match serde_json::from_value(value) {
            Ok(document) => document,
            Err(e) => {
                warn!("Replacing malformed overlay metadata with an empty collection: {}", e);
                OverlayDocument::new()
            }
        }
    }

    /// Fully replace the stored stroke collection. Serialization hands the
    /// store a fresh value, never one aliasing engine state.
    pub fn write(&self, document: &OverlayDocument) -> StoreResult<()> {
        let value = serde_json::to_value(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(OVERLAY_KEY, value)
    }

    /// Whether a change notification concerns the overlay key. Notices
    /// with no recognizable key are conservatively treated as a match.
    pub fn matches(&self, notice: &ChangeNotice) -> bool {
        notice.key.as_deref().is_none_or(|key| key == OVERLAY_KEY)
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> &Arc<dyn MetadataStore> {
        &self.store
    }
}
