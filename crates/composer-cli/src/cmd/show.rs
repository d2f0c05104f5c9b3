use anyhow::{Context, Result, bail};
use composer_core::{PackageName, RegistryConfig};
use serde_json::Value;

/// Pretty-print the registry, or the versions of one package.
pub async fn show(config: &RegistryConfig, package: Option<&str>) -> Result<()> {
    let (_, repo) = super::repository(config);
    let doc = repo.packages().await?;

    let value = if let Some(name) = package {
        let name = PackageName::new(name);
        match doc.versions(&name)? {
            Some(versions) => Value::Object(versions),
            None => bail!("Package '{name}' not found in {}", repo.index_key()),
        }
    } else {
        serde_json::from_slice(&doc.serialize()).context("Registry is not valid JSON")?
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
