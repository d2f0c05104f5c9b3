//! Key-value byte stores.
//!
//! Layout: every blob lives under a [`Key`]; `packages.json` holds the
//! registry index and `p/<vendor>/<project>.json` the per-package documents.

use async_trait::async_trait;
use bytes::Bytes;
use composer_schema::Key;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Errors returned by a [`Storage`] backend.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// Nothing is stored under the key.
    #[error("No value stored under '{0}'")]
    NotFound(Key),

    /// The backend failed to read or write the key.
    #[error("IO error on '{key}': {source}")]
    Io {
        /// Key being accessed.
        key: Key,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// An asynchronous key-value byte store.
///
/// No read-modify-write atomicity is offered: two writers saving the same
/// key race and the last `save` wins.
#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Check whether a value is stored under `key`.
    async fn exists(&self, key: &Key) -> Result<bool, StorageError>;

    /// Read the value stored under `key`.
    async fn value(&self, key: &Key) -> Result<Bytes, StorageError>;

    /// Store `content` under `key`, replacing any previous value.
    async fn save(&self, key: &Key, content: Bytes) -> Result<(), StorageError>;
}

/// Storage kept in process memory. Mostly useful for tests.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    data: RwLock<HashMap<Key, Bytes>>,
}

impl InMemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn exists(&self, key: &Key) -> Result<bool, StorageError> {
        Ok(self.data.read().await.contains_key(key))
    }

    async fn value(&self, key: &Key) -> Result<Bytes, StorageError> {
        self.data
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.clone()))
    }

    async fn save(&self, key: &Key, content: Bytes) -> Result<(), StorageError> {
        self.data.write().await.insert(key.clone(), content);
        Ok(())
    }
}

/// Storage backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first `save`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &Key) -> PathBuf {
        self.root.join(key.to_path())
    }
}

fn io_error(key: &Key) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.clone(),
        source,
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn exists(&self, key: &Key) -> Result<bool, StorageError> {
        tokio::fs::try_exists(self.path(key))
            .await
            .map_err(io_error(key))
    }

    async fn value(&self, key: &Key) -> Result<Bytes, StorageError> {
        match tokio::fs::read(self.path(key)).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.clone()))
            }
            Err(e) => Err(io_error(key)(e)),
        }
    }

    async fn save(&self, key: &Key, content: Bytes) -> Result<(), StorageError> {
        let target = self.path(key);
        let dir = target
            .parent()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(io_error(key))?;

        // Each write gets its own temp file beside the target, then is renamed
        // into place: readers never see a torn file and the last rename wins.
        let len = content.len();
        let dest = target.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&content)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&dest).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)
        .and_then(|res| res)
        .map_err(io_error(key))?;

        tracing::debug!("Saved {len} bytes to {}", target.display());
        Ok(())
    }
}
