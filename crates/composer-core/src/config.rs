//! Registry configuration.

use anyhow::{Context, Result, anyhow};
use composer_schema::{DEFAULT_INDEX_KEY, Key};
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the storage root directory.
pub const ROOT_ENV: &str = "COMPOSER_REGISTRY_ROOT";

/// Environment variable overriding the index key.
pub const INDEX_ENV: &str = "COMPOSER_REGISTRY_INDEX";

/// Where the registry lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Root directory of the filesystem storage.
    pub root: PathBuf,
    /// Key of the index document inside the storage.
    pub index_key: Key,
}

impl RegistryConfig {
    /// Build a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns an error if `index_key` is not a valid storage key.
    pub fn new(root: impl Into<PathBuf>, index_key: &str) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            index_key: Key::new(index_key)
                .with_context(|| format!("Invalid index key '{index_key}'"))?,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// `COMPOSER_REGISTRY_ROOT` defaults to [`default_root`] and
    /// `COMPOSER_REGISTRY_INDEX` to `packages.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if `COMPOSER_REGISTRY_INDEX` is not a valid key.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Load configuration from `lookup`, which maps [`ROOT_ENV`] and
    /// [`INDEX_ENV`] to their values. Unset names fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the index value is not UTF-8 or not a valid key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self> {
        let root = lookup(ROOT_ENV).map_or_else(default_root, PathBuf::from);
        let index = match lookup(INDEX_ENV) {
            Some(value) => value.into_string().map_err(|v| {
                anyhow!("{INDEX_ENV} is not valid UTF-8: {}", v.to_string_lossy())
            })?,
            None => DEFAULT_INDEX_KEY.to_string(),
        };
        Self::new(root, &index)
    }
}

/// Default storage root: `<data dir>/composer-registry`, or `./registry`
/// when the platform has no data directory.
pub fn default_root() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("registry"),
        |dir| dir.join("composer-registry"),
    )
}
