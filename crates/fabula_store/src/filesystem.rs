//! Filesystem-based asset storage implementation.

use crate::AssetStore;
use fabula_core::{AssetId, AssetKind};
use fabula_error::{FabulaResult, StoreError, StoreErrorKind};
use std::path::PathBuf;
use strum::IntoEnumIterator;

/// Filesystem storage backend.
///
/// Stores assets under their logical ids, one subdirectory per asset kind:
/// `{base_path}/{kind}/{id}.png`
///
/// # Example Structure
///
/// ```text
/// /var/fabula/assets/
/// ├── character/
/// │   ├── char_kael.png
/// │   └── char_lyra.png
/// ├── background/
/// │   ├── bg_0.png
/// │   └── bg_1.png
/// └── scene/
///     └── scene_0.png
/// ```
///
/// Writes go to a temp file first and are renamed into place, so a put that
/// overwrites an existing asset never leaves a torn file behind.
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> FabulaResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StoreError::new(StoreErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem asset store");
        Ok(Self { base_path })
    }

    /// Filesystem path for a logical id: `{base}/{kind}/{id}.png`.
    fn asset_path(&self, id: &AssetId) -> PathBuf {
        self.base_path
            .join(id.kind().as_str())
            .join(format!("{}.png", id.as_str()))
    }
}

#[async_trait::async_trait]
impl AssetStore for FileSystemStore {
    #[tracing::instrument(skip(self, data), fields(id = %id, size = data.len()))]
    async fn put(&self, id: &AssetId, data: &[u8]) -> FabulaResult<()> {
        let path = self.asset_path(id);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::new(StoreErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StoreError::new(StoreErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StoreError::new(StoreErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            id = %id,
            path = %path.display(),
            size = data.len(),
            "Stored asset file"
        );

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get(&self, id: &AssetId) -> FabulaResult<Vec<u8>> {
        let path = self.asset_path(id);

        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::new(StoreErrorKind::NotFound(id.as_str().to_string()))
            } else {
                StoreError::new(StoreErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(
            id = %id,
            path = %path.display(),
            size = data.len(),
            "Retrieved asset file"
        );

        Ok(data)
    }

    async fn exists(&self, id: &AssetId) -> FabulaResult<bool> {
        let path = self.asset_path(id);
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, prefix: &str) -> FabulaResult<Vec<String>> {
        let mut ids = Vec::new();

        for kind in AssetKind::iter() {
            let dir = self.base_path.join(kind.as_str());
            if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
                continue;
            }

            let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
                StoreError::new(StoreErrorKind::List(format!("{}: {}", dir.display(), e)))
            })?;

            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                StoreError::new(StoreErrorKind::List(format!("{}: {}", dir.display(), e)))
            })? {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("png") {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
                    && stem.starts_with(prefix)
                {
                    ids.push(stem.to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }
}
