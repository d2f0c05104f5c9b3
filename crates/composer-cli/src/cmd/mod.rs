pub mod add;
pub mod init;
pub mod show;

use composer_core::{FileStorage, RegistryConfig, Repository};
use std::sync::Arc;

/// Open the filesystem-backed repository described by `config`.
pub fn repository(config: &RegistryConfig) -> (Arc<FileStorage>, Repository) {
    let storage = Arc::new(FileStorage::new(&config.root));
    let repo = Repository::new(storage.clone(), config.index_key.clone());
    (storage, repo)
}
