//! # Durable Stores
//!
//! A [`Store`] holds the complete record collection. The actor loads all of it
//! for every request and writes all of it back after every mutation, so a store
//! only needs two operations. Writes must be all-or-nothing: a failed save has
//! to leave the previously persisted collection readable.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Errors raised by a [`Store`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ledger file {} is not a valid record array: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode records: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable backing for a full record collection.
#[async_trait]
pub trait Store<T: Send + Sync>: Send + Sync + 'static {
    /// Read the whole collection, in ledger order.
    async fn load(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the whole collection.
    async fn save(&self, items: &[T]) -> Result<(), StoreError>;
}

// =============================================================================
// JSON FILE
// =============================================================================

/// A single pretty-printed JSON array on disk.
///
/// Saves go to a sibling `*.tmp` file which is flushed to disk and then renamed
/// over the original, so readers only ever see a complete array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store, initialising the file to `[]` if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|source| io_error(&path, source))?;
        if !exists {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| io_error(parent, source))?;
            }
            write_atomically(&path, b"[]").await?;
            info!(path = %path.display(), "Initialised empty ledger");
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> Store<T> for JsonFileStore
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| io_error(&self.path, source))?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(items).map_err(StoreError::Encode)?;
        write_atomically(&self.path, &bytes).await?;
        debug!(path = %self.path.display(), records = items.len(), "Ledger written");
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let written = async {
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|source| io_error(&tmp, source))?;
        file.write_all(bytes)
            .await
            .map_err(|source| io_error(&tmp, source))?;
        file.sync_all()
            .await
            .map_err(|source| io_error(&tmp, source))?;
        drop(file);

        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|source| io_error(path, source))
    }
    .await;

    if written.is_err() {
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    path = %tmp.display(),
                    error = %e,
                    "Failed to remove temporary ledger file"
                );
            }
        }
    }
    written
}

// =============================================================================
// IN MEMORY
// =============================================================================

/// Volatile store for tests and demos. Clones share the same collection.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            items: Arc::new(Mutex::new(records)),
        }
    }

    /// Copy of the stored collection, bypassing the actor.
    pub fn snapshot(&self) -> Vec<T> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl<T> Store<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>, StoreError> {
        self.items
            .lock()
            .map(|items| items.clone())
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        *guard = items.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_initialises_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("orders.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "[]");

        let items: Vec<u32> = store.load().await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_open_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        let items: Vec<u32> = store.load().await.unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_array_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        Store::<u32>::save(&store, &[10, 20]).await.unwrap();
        Store::<u32>::save(&store, &[30]).await.unwrap();

        let items: Vec<u32> = store.load().await.unwrap();
        assert_eq!(items, vec![30]);
        assert!(!dir.path().join("orders.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_save_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        // A directory in the ledger's place makes the final rename fail.
        std::fs::create_dir(&path).unwrap();
        let store = JsonFileStore::open(&path).await.unwrap();

        let err = Store::<u32>::save(&store, &[10]).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!dir.path().join("orders.json.tmp").exists());
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(&path, "{ not an array").unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        let err = Store::<u32>::load(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
