use anyhow::{Context, Result};
use composer_core::{JsonPackage, Package, RegistryConfig};
use std::path::PathBuf;

/// Add every `composer.json` in `files`, in order. Stops at the first failure.
pub async fn add(config: &RegistryConfig, files: &[PathBuf]) -> Result<()> {
    let (_, repo) = super::repository(config);

    for file in files {
        let content = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let package = JsonPackage::from_bytes(content);

        repo.add(&package)
            .await
            .with_context(|| format!("Failed to add {}", file.display()))?;

        let name = package.name().await?;
        let version = package.version().await?;
        println!("  added {name} {version}");
    }

    Ok(())
}
