//! Catalog port - durable storage of accepted items

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::{Catalog, DuplicateId, ItemRecord, ItemType};

/// Outcome of a successful merge-write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    pub path: PathBuf,
    pub previous_count: usize,
    pub added: usize,
    pub total: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A merged item collided with an existing id. Indicates a bug upstream;
    /// the catalog on disk is left as it was.
    #[error("Catalog collision: {0}")]
    Collision(#[from] DuplicateId),
    #[error("Catalog I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog at {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Load the catalog for `item_type`, empty if it does not exist yet
    async fn load(&self, item_type: ItemType) -> Result<Catalog, CatalogError>;

    /// Append `items` to the stored catalog, all or nothing
    async fn merge_and_persist(
        &self,
        item_type: ItemType,
        items: &[ItemRecord],
    ) -> Result<WriteResult, CatalogError>;

    /// Items accepted by an earlier run whose merge-write failed
    async fn load_pending(&self, item_type: ItemType) -> Result<Vec<ItemRecord>, CatalogError>;

    /// Park `items` until a later run can merge them, replacing any earlier
    /// pending set. Returns where they were stored.
    async fn save_pending(
        &self,
        item_type: ItemType,
        items: &[ItemRecord],
    ) -> Result<PathBuf, CatalogError>;

    /// Drop the pending set once it has been merged
    async fn clear_pending(&self, item_type: ItemType) -> Result<(), CatalogError>;
}
