//! The Composer `packages.json` registry document.
//!
//! ```text
//! {
//!   "packages": {
//!     "acme/widget": {
//!       "1.0.0": { ...composer.json of 1.0.0... },
//!       "2.0.0": { ... }
//!     }
//!   }
//! }
//! ```
//!
//! A [`RegistryDocument`] is an immutable value over the serialized bytes.
//! Merging parses those bytes into a fresh tree, writes the one version entry
//! into it and re-serializes into a new document. Existing keys keep their
//! position; new keys are appended.

use bytes::Bytes;
use composer_schema::{Key, PACKAGES_ATTRIBUTE, PackageName};
use serde_json::{Map, Value};

use crate::package::{DescriptorError, Package};
use crate::storage::{Storage, StorageError};

/// Errors raised while reading or merging a registry document.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    /// The document cannot be merged into (no usable `packages` object).
    #[error("Malformed registry: {0}")]
    Malformed(String),

    /// The document bytes are not valid JSON.
    #[error("Registry is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The package descriptor failed to resolve.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Packages registry built from JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryDocument {
    raw: Bytes,
}

impl Default for RegistryDocument {
    /// An empty registry: `{"packages":{}}`.
    fn default() -> Self {
        let mut root = Map::new();
        root.insert(PACKAGES_ATTRIBUTE.to_string(), Value::Object(Map::new()));
        Self::from_value(root)
    }
}

impl RegistryDocument {
    /// Wrap existing serialized content (e.g. loaded from storage).
    ///
    /// The bytes are not inspected here; a document without a `packages`
    /// object is only rejected once it is merged into.
    pub fn from_bytes(raw: impl Into<Bytes>) -> Self {
        Self { raw: raw.into() }
    }

    fn from_value(root: Map<String, Value>) -> Self {
        Self {
            raw: Bytes::from(Value::Object(root).to_string()),
        }
    }

    /// Serialized content of this document.
    pub fn serialize(&self) -> Bytes {
        self.raw.clone()
    }

    /// Save the serialized content to `storage` under `key`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`StorageError`] the backend reports.
    pub async fn persist(&self, storage: &dyn Storage, key: &Key) -> Result<(), StorageError> {
        tracing::debug!("Persisting registry ({} bytes) to {key}", self.raw.len());
        storage.save(key, self.serialize()).await
    }

    /// Return a new document with one package version added.
    ///
    /// Existing packages and the other versions of the same package are kept
    /// as they are. If the version is already present, its metadata is
    /// replaced entirely. Unknown top-level fields are carried over.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Json`] if the current bytes are not JSON,
    /// [`RegistryError::Malformed`] if they hold no usable `packages` object,
    /// and [`RegistryError::Descriptor`] if `package` fails to resolve.
    pub async fn merge<P>(&self, package: &P) -> Result<Self, RegistryError>
    where
        P: Package + ?Sized,
    {
        let mut root = self.root()?;
        let packages = packages_mut(&mut root)?;

        let (name, version, json) =
            futures::try_join!(package.name(), package.version(), package.json())?;

        let entry = packages.entry(name.as_str()).or_insert(Value::Null);
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
        let Some(versions) = entry.as_object_mut() else {
            return Err(RegistryError::Malformed(format!(
                "entry for '{name}' is not an object"
            )));
        };
        let replaced = versions
            .insert(version.to_string(), Value::Object(json))
            .is_some();
        tracing::debug!(
            "Merged {name} {version} into registry ({} versions{})",
            versions.len(),
            if replaced { ", replaced existing" } else { "" }
        );

        Ok(Self::from_value(root))
    }

    /// Parsed `packages` object of this document.
    ///
    /// # Errors
    ///
    /// Same validation as [`merge`](Self::merge): fails if the bytes are not
    /// JSON or hold no `packages` object.
    pub fn packages(&self) -> Result<Map<String, Value>, RegistryError> {
        let mut root = self.root()?;
        packages_mut(&mut root).map(std::mem::take)
    }

    /// Versions recorded for `name`, if the package is present.
    ///
    /// # Errors
    ///
    /// Fails like [`packages`](Self::packages).
    pub fn versions(
        &self,
        name: &PackageName,
    ) -> Result<Option<Map<String, Value>>, RegistryError> {
        match self.packages()?.remove(name.as_str()) {
            Some(Value::Object(versions)) => Ok(Some(versions)),
            _ => Ok(None),
        }
    }

    fn root(&self) -> Result<Map<String, Value>, RegistryError> {
        match serde_json::from_slice(&self.raw)? {
            Value::Object(root) => Ok(root),
            _ => Err(RegistryError::Malformed(
                "top level is not a JSON object".to_string(),
            )),
        }
    }
}

/// The `packages` object inside `root`.
fn packages_mut(root: &mut Map<String, Value>) -> Result<&mut Map<String, Value>, RegistryError> {
    match root.get_mut(PACKAGES_ATTRIBUTE) {
        Some(Value::Object(packages)) => Ok(packages),
        None | Some(Value::Null) => Err(RegistryError::Malformed(format!(
            "no '{PACKAGES_ATTRIBUTE}' object found"
        ))),
        Some(_) => Err(RegistryError::Malformed(format!(
            "'{PACKAGES_ATTRIBUTE}' is not an object"
        ))),
    }
}
