//! Registry repository: load, merge and save against a [`Storage`].

use bytes::Bytes;
use composer_schema::{Key, KeyError, PackageName};
use std::sync::Arc;

use crate::package::{JsonPackage, Package};
use crate::packages::{RegistryDocument, RegistryError};
use crate::storage::{Storage, StorageError};

/// Errors raised by [`Repository`] operations.
#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    /// Reading or writing a document failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A stored document could not be merged into.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The package name cannot be turned into a storage key.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// A Composer repository kept in a [`Storage`].
///
/// The index lives under one key (usually `packages.json`); each package also
/// gets its own document under `p/<vendor>/<project>.json`.
///
/// Adds are not coordinated: two concurrent `add` calls against the same
/// storage can each load the same index and the later save wins.
#[derive(Debug, Clone)]
pub struct Repository {
    storage: Arc<dyn Storage>,
    index: Key,
}

impl Repository {
    /// Create a repository over `storage` with its index under `index`.
    pub fn new(storage: Arc<dyn Storage>, index: Key) -> Self {
        Self { storage, index }
    }

    /// Key of the registry index.
    pub fn index_key(&self) -> &Key {
        &self.index
    }

    /// Key of the per-package document for `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if the name contains segments that are not
    /// allowed in a key (e.g. `..`).
    pub fn package_key(name: &PackageName) -> Result<Key, KeyError> {
        Key::new(&format!("p/{name}.json"))
    }

    /// Current registry index, or an empty one if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the index cannot be read.
    pub async fn packages(&self) -> Result<RegistryDocument, RepositoryError> {
        self.load(&self.index).await
    }

    /// Write an empty index, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the index cannot be written.
    pub async fn init(&self) -> Result<RegistryDocument, RepositoryError> {
        let doc = RegistryDocument::default();
        doc.persist(self.storage.as_ref(), &self.index).await?;
        tracing::info!("Initialized empty registry at {}", self.index);
        Ok(doc)
    }

    /// Add one package version to the index and to its per-package document.
    ///
    /// Both documents are merged before either is written, so a malformed
    /// document or a failing descriptor leaves storage untouched. The two
    /// saves are separate: if saving the index fails, the per-package
    /// document has already been written and is ahead of the index.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Registry`] if a merge fails,
    /// [`RepositoryError::Key`] for names that do not map to a key and
    /// [`RepositoryError::Storage`] if loading or saving fails.
    pub async fn add<P>(&self, package: &P) -> Result<RegistryDocument, RepositoryError>
    where
        P: Package + ?Sized,
    {
        let name = package.name().await.map_err(RegistryError::from)?;
        let package_key = Self::package_key(&name)?;

        let (index, single) =
            tokio::try_join!(self.load(&self.index), self.load(&package_key))?;
        let (index, single) = tokio::try_join!(index.merge(package), single.merge(package))?;

        single.persist(self.storage.as_ref(), &package_key).await?;
        index.persist(self.storage.as_ref(), &self.index).await?;

        tracing::info!("Added {name} to {}", self.index);
        Ok(index)
    }

    /// Add the package described by a `composer.json` document.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub async fn add_json(&self, content: Bytes) -> Result<RegistryDocument, RepositoryError> {
        self.add(&JsonPackage::from_bytes(content)).await
    }

    async fn load(&self, key: &Key) -> Result<RegistryDocument, RepositoryError> {
        match self.storage.value(key).await {
            Ok(raw) => Ok(RegistryDocument::from_bytes(raw)),
            Err(StorageError::NotFound(_)) => {
                tracing::debug!("No document at {key}, starting empty");
                Ok(RegistryDocument::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use serde_json::{Value, json};

    fn repo() -> (Arc<InMemoryStorage>, Repository) {
        let storage = Arc::new(InMemoryStorage::new());
        let repo = Repository::new(storage.clone(), Key::new("packages.json").unwrap());
        (storage, repo)
    }

    async fn stored(storage: &InMemoryStorage, key: &str) -> Value {
        let raw = storage.value(&Key::new(key).unwrap()).await.unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_packages_defaults_to_empty() {
        let (_, repo) = repo();
        assert_eq!(repo.packages().await.unwrap(), RegistryDocument::default());
    }

    #[tokio::test]
    async fn test_add_writes_index_and_package_file() {
        let (storage, repo) = repo();

        repo.add_json(Bytes::from_static(
            br#"{"name":"acme/widget","version":"1.0.0"}"#,
        ))
        .await
        .unwrap();

        let meta = json!({"name": "acme/widget", "version": "1.0.0"});
        assert_eq!(
            stored(&storage, "packages.json").await,
            json!({"packages": {"acme/widget": {"1.0.0": meta}}})
        );
        assert_eq!(
            stored(&storage, "p/acme/widget.json").await,
            json!({"packages": {"acme/widget": {"1.0.0": meta}}})
        );
    }

    #[tokio::test]
    async fn test_second_add_keeps_first_package() {
        let (storage, repo) = repo();

        repo.add_json(Bytes::from_static(br#"{"name":"acme/widget","version":"1.0.0"}"#))
            .await
            .unwrap();
        repo.add_json(Bytes::from_static(br#"{"name":"acme/gadget","version":"2.0.0"}"#))
            .await
            .unwrap();

        let index = stored(&storage, "packages.json").await;
        assert!(index["packages"]["acme/widget"]["1.0.0"].is_object());
        assert!(index["packages"]["acme/gadget"]["2.0.0"].is_object());

        // Per-package documents only hold their own package.
        let gadget = stored(&storage, "p/acme/gadget.json").await;
        assert_eq!(gadget["packages"].as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_index_is_not_overwritten() {
        let (storage, repo) = repo();
        let key = Key::new("packages.json").unwrap();
        storage
            .save(&key, Bytes::from_static(br#"{"other":1}"#))
            .await
            .unwrap();

        let err = repo
            .add_json(Bytes::from_static(br#"{"name":"acme/widget","version":"1.0.0"}"#))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::Registry(RegistryError::Malformed(_))
        ));
        assert_eq!(
            storage.value(&key).await.unwrap(),
            Bytes::from_static(br#"{"other":1}"#)
        );
        assert!(
            !storage
                .exists(&Key::new("p/acme/widget.json").unwrap())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_bad_descriptor_fails() {
        let (_, repo) = repo();
        let err = repo
            .add_json(Bytes::from_static(br#"{"version":"1.0.0"}"#))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Registry(RegistryError::Descriptor(_))
        ));
    }

    #[test]
    fn test_package_key() {
        let key = Repository::package_key(&PackageName::new("acme/widget")).unwrap();
        assert_eq!(key.as_str(), "p/acme/widget.json");
        assert!(Repository::package_key(&PackageName::new("../widget")).is_err());
    }

    #[tokio::test]
    async fn test_init_resets_index() {
        let (storage, repo) = repo();
        repo.add_json(Bytes::from_static(br#"{"name":"acme/widget","version":"1.0.0"}"#))
            .await
            .unwrap();

        repo.init().await.unwrap();
        assert_eq!(stored(&storage, "packages.json").await, json!({"packages": {}}));
    }

    /// Storage that refuses to write one key.
    #[derive(Debug)]
    struct RejectingStorage {
        inner: InMemoryStorage,
        rejected: Key,
    }

    #[async_trait::async_trait]
    impl Storage for RejectingStorage {
        async fn exists(&self, key: &Key) -> Result<bool, StorageError> {
            self.inner.exists(key).await
        }

        async fn value(&self, key: &Key) -> Result<Bytes, StorageError> {
            self.inner.value(key).await
        }

        async fn save(&self, key: &Key, content: Bytes) -> Result<(), StorageError> {
            if *key == self.rejected {
                return Err(StorageError::Io {
                    key: key.clone(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.save(key, content).await
        }
    }

    #[tokio::test]
    async fn test_index_save_failure_leaves_package_file_ahead() {
        let index = Key::new("packages.json").unwrap();
        let storage = Arc::new(RejectingStorage {
            inner: InMemoryStorage::new(),
            rejected: index.clone(),
        });
        let repo = Repository::new(storage.clone(), index.clone());

        let err = repo
            .add_json(Bytes::from_static(br#"{"name":"acme/widget","version":"1.0.0"}"#))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Storage(StorageError::Io { .. })));
        assert!(!storage.exists(&index).await.unwrap());
        assert_eq!(
            stored(&storage.inner, "p/acme/widget.json").await,
            json!({"packages": {"acme/widget": {"1.0.0": {"name": "acme/widget", "version": "1.0.0"}}}})
        );
    }
}
