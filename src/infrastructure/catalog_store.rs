//! JSON file catalog store
//!
//! One pretty-printed JSON array per item type inside a catalog directory.
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so readers only ever see the old or the new catalog.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::application::ports::outbound::{CatalogError, CatalogPort, WriteResult};
use crate::domain::entities::{Catalog, ItemRecord, ItemType};

/// Catalog store backed by `<dir>/<type>.json` files
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    dir: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, item_type: ItemType) -> PathBuf {
        self.dir.join(item_type.catalog_file_name())
    }

    /// `<dir>/<type>.pending.json`, next to the catalog it belongs to
    pub fn pending_path_for(&self, item_type: ItemType) -> PathBuf {
        self.path_for(item_type).with_extension("pending.json")
    }
}

#[async_trait]
impl CatalogPort for JsonCatalogStore {
    async fn load(&self, item_type: ItemType) -> Result<Catalog, CatalogError> {
        let path = self.path_for(item_type);
        let task_path = path.clone();
        run_blocking(path, move || load_catalog(&task_path, item_type)).await
    }

    async fn merge_and_persist(
        &self,
        item_type: ItemType,
        items: &[ItemRecord],
    ) -> Result<WriteResult, CatalogError> {
        let path = self.path_for(item_type);
        let task_path = path.clone();
        let items = items.to_vec();
        run_blocking(path, move || merge_and_persist(&task_path, item_type, &items)).await
    }

    async fn load_pending(&self, item_type: ItemType) -> Result<Vec<ItemRecord>, CatalogError> {
        let path = self.pending_path_for(item_type);
        let task_path = path.clone();
        run_blocking(path, move || load_pending(&task_path, item_type)).await
    }

    async fn save_pending(
        &self,
        item_type: ItemType,
        items: &[ItemRecord],
    ) -> Result<PathBuf, CatalogError> {
        let path = self.pending_path_for(item_type);
        let task_path = path.clone();
        let entries = Value::Array(items.iter().map(ItemRecord::to_json).collect());
        run_blocking(path, move || {
            write_atomic(&task_path, &entries)?;
            Ok(task_path)
        })
        .await
    }

    async fn clear_pending(&self, item_type: ItemType) -> Result<(), CatalogError> {
        let path = self.pending_path_for(item_type);
        let task_path = path.clone();
        run_blocking(path, move || match std::fs::remove_file(&task_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CatalogError::Io {
                path: task_path,
                source,
            }),
        })
        .await
    }
}

async fn run_blocking<R, F>(path: PathBuf, f: F) -> Result<R, CatalogError>
where
    R: Send + 'static,
    F: FnOnce() -> Result<R, CatalogError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CatalogError::Io {
            path,
            source: std::io::Error::other(e.to_string()),
        })?
}

/// Read the catalog at `path`; a missing or blank file is an empty catalog
pub fn load_catalog(path: &Path, item_type: ItemType) -> Result<Catalog, CatalogError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Catalog::empty(item_type)),
        Err(source) => {
            return Err(CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if raw.trim().is_empty() {
        return Ok(Catalog::empty(item_type));
    }

    let parsed: Value = serde_json::from_str(&raw).map_err(|e| CatalogError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match parsed {
        Value::Array(entries) => Ok(Catalog::from_entries(item_type, entries)),
        _ => Err(CatalogError::Malformed {
            path: path.to_path_buf(),
            reason: "expected a JSON array of items".to_string(),
        }),
    }
}

/// Read items parked at `path` by an earlier failed write.
///
/// Entries that no longer read as items are skipped.
pub fn load_pending(path: &Path, item_type: ItemType) -> Result<Vec<ItemRecord>, CatalogError> {
    let entries = load_catalog(path, item_type)?.into_entries();
    let total = entries.len();
    let items: Vec<ItemRecord> = entries
        .iter()
        .filter_map(|entry| ItemRecord::from_untrusted(item_type, entry).ok())
        .collect();

    if items.len() < total {
        tracing::warn!(
            "Skipped {} unreadable pending {} items in {}",
            total - items.len(),
            item_type,
            path.display()
        );
    }
    Ok(items)
}

/// Append `items` to the catalog at `path`, all or nothing.
///
/// An empty `items` never touches the file.
pub fn merge_and_persist(
    path: &Path,
    item_type: ItemType,
    items: &[ItemRecord],
) -> Result<WriteResult, CatalogError> {
    let mut catalog = load_catalog(path, item_type)?;
    let previous_count = catalog.len();

    if items.is_empty() {
        return Ok(WriteResult {
            path: path.to_path_buf(),
            previous_count,
            added: 0,
            total: previous_count,
        });
    }

    let added = catalog.append(items)?;
    let total = catalog.len();
    write_atomic(path, &Value::Array(catalog.into_entries()))?;

    tracing::info!(
        "Wrote {} new {} items to {} ({} total)",
        added,
        item_type,
        path.display(),
        total
    );

    Ok(WriteResult {
        path: path.to_path_buf(),
        previous_count,
        added,
        total,
    })
}

fn write_atomic(path: &Path, value: &Value) -> Result<(), CatalogError> {
    let io_error = |source: std::io::Error| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_error)?;

    let mut body = serde_json::to_string_pretty(value)
        .map_err(|e| io_error(std::io::Error::other(e)))?;
    body.push('\n');

    let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
    temp.write_all(body.as_bytes()).map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}
