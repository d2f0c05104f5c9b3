use anyhow::{Result, bail};
use composer_core::{RegistryConfig, Storage};

/// Write an empty registry index.
pub async fn init(config: &RegistryConfig, force: bool) -> Result<()> {
    let (storage, repo) = super::repository(config);

    if !force && storage.exists(repo.index_key()).await? {
        bail!(
            "Registry already exists at {}. Use --force to replace it.",
            storage.root().join(repo.index_key().to_path()).display()
        );
    }

    repo.init().await?;
    println!("  initialized {}", repo.index_key());
    Ok(())
}
