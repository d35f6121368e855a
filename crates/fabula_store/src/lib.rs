//! Logical-id asset storage for the Fabula pipeline.
//!
//! Generated binary assets (character portraits, background plates, scene
//! composites) are addressed by deterministic, human-readable logical ids.
//! Storing under an existing id overwrites silently: repeated generation
//! re-runs replace prior art, which is the regeneration mechanism.
//!
//! # Example
//!
//! ```rust
//! use fabula_core::AssetId;
//! use fabula_store::{AssetStore, MemoryStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let id = AssetId::character("Kael");
//!
//! store.put(&id, &[0x89, 0x50, 0x4E, 0x47]).await?;
//! let bytes = store.get(&id).await?;
//! assert_eq!(bytes.len(), 4);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use fabula_core::AssetId;
use fabula_error::FabulaResult;

mod filesystem;
mod memory;

pub use fabula_error::{StoreError, StoreErrorKind};
pub use filesystem::FileSystemStore;
pub use memory::MemoryStore;

/// Trait for pluggable asset storage backends.
///
/// The store assumes single-run use: ids are stable for the duration of a
/// pipeline run and resolvable back to their bytes. Implementations must
/// serialize writes per logical id, since duplicate character names can put
/// to the same id.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// Store asset bytes under a logical id, silently overwriting any
    /// existing entry.
    async fn put(&self, id: &AssetId, data: &[u8]) -> FabulaResult<()>;

    /// Retrieve asset bytes by logical id.
    ///
    /// # Errors
    ///
    /// Returns `StoreErrorKind::NotFound` when no asset exists under the id.
    async fn get(&self, id: &AssetId) -> FabulaResult<Vec<u8>>;

    /// Check whether an asset exists under the id.
    async fn exists(&self, id: &AssetId) -> FabulaResult<bool>;

    /// List stored logical ids starting with the given prefix, in
    /// lexicographic order.
    async fn list(&self, prefix: &str) -> FabulaResult<Vec<String>>;
}
