//! In-memory asset storage backend.

use crate::AssetStore;
use fabula_core::AssetId;
use fabula_error::{FabulaResult, StoreError, StoreErrorKind};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory storage backend.
///
/// Assets live in a `BTreeMap` keyed by logical id string, so prefix listing
/// comes back in lexicographic order for free. The map sits behind a mutex,
/// which serializes puts per store; two writers to the same id are
/// last-write-wins, never torn.
///
/// Intended for tests and single-process runs that do not need artifacts to
/// outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    assets: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored assets.
    pub fn len(&self) -> usize {
        self.assets.lock().expect("store mutex poisoned").len()
    }

    /// True if no assets are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl AssetStore for MemoryStore {
    async fn put(&self, id: &AssetId, data: &[u8]) -> FabulaResult<()> {
        let mut assets = self.assets.lock().expect("store mutex poisoned");
        let replaced = assets.insert(id.as_str().to_string(), data.to_vec()).is_some();

        tracing::debug!(
            id = %id,
            size = data.len(),
            replaced,
            "Stored asset"
        );

        Ok(())
    }

    async fn get(&self, id: &AssetId) -> FabulaResult<Vec<u8>> {
        let assets = self.assets.lock().expect("store mutex poisoned");
        assets
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound(id.as_str().to_string())).into())
    }

    async fn exists(&self, id: &AssetId) -> FabulaResult<bool> {
        let assets = self.assets.lock().expect("store mutex poisoned");
        Ok(assets.contains_key(id.as_str()))
    }

    async fn list(&self, prefix: &str) -> FabulaResult<Vec<String>> {
        let assets = self.assets.lock().expect("store mutex poisoned");
        Ok(assets
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
