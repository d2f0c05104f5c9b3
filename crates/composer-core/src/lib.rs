//! Core library for the Composer package registry.
//!
//! The heart of the crate is [`RegistryDocument`], an immutable
//! `packages.json` value that can absorb one package version at a time via
//! [`RegistryDocument::merge`]. Around it live the collaborators it talks to:
//! package descriptors ([`Package`]), byte stores ([`Storage`]) and the
//! [`Repository`] facade that ties loading, merging and saving together.

pub mod config;
pub mod package;
pub mod packages;
pub mod repository;
pub mod storage;

pub use config::RegistryConfig;
pub use package::{DescriptorError, JsonPackage, Package};
pub use packages::{RegistryDocument, RegistryError};
pub use repository::{Repository, RepositoryError};
pub use storage::{FileStorage, InMemoryStorage, Storage, StorageError};

pub use composer_schema::{DEFAULT_INDEX_KEY, Key, PackageName, Version};
