//! Package descriptors.
//!
//! A descriptor supplies the three things a registry needs to record one
//! package version: its name, its version and its metadata object. Each is
//! retrieved asynchronously and independently.

use async_trait::async_trait;
use bytes::Bytes;
use composer_schema::{NameError, PackageName, Version};
use serde_json::{Map, Value};

/// Errors raised while resolving a descriptor.
#[derive(thiserror::Error, Debug)]
pub enum DescriptorError {
    /// The descriptor source is not valid JSON.
    #[error("Invalid package JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The descriptor source is valid JSON but not an object.
    #[error("Package JSON is not an object")]
    NotAnObject,

    /// A required string field is absent or not a string.
    #[error("Package JSON has no '{0}' string field")]
    MissingField(&'static str),

    /// The `name` field is not a valid `vendor/project` name.
    #[error(transparent)]
    InvalidName(#[from] NameError),
}

/// A source of one package version to be added to a registry.
#[async_trait]
pub trait Package: Send + Sync {
    /// Package name (e.g. `acme/widget`).
    async fn name(&self) -> Result<PackageName, DescriptorError>;

    /// Version being described (e.g. `1.0.0`).
    async fn version(&self) -> Result<Version, DescriptorError>;

    /// Metadata recorded for this version.
    async fn json(&self) -> Result<Map<String, Value>, DescriptorError>;
}

/// A package described by a `composer.json` document.
///
/// The bytes are kept as given and parsed on every access, so constructing a
/// `JsonPackage` never fails; errors surface when a field is requested.
#[derive(Debug, Clone)]
pub struct JsonPackage {
    source: Bytes,
}

impl JsonPackage {
    /// Wrap the raw `composer.json` content.
    pub fn from_bytes(source: impl Into<Bytes>) -> Self {
        Self {
            source: source.into(),
        }
    }

    fn parse(&self) -> Result<Map<String, Value>, DescriptorError> {
        match serde_json::from_slice(&self.source)? {
            Value::Object(map) => Ok(map),
            _ => Err(DescriptorError::NotAnObject),
        }
    }

    fn string_field(&self, field: &'static str) -> Result<String, DescriptorError> {
        match self.parse()?.remove(field) {
            Some(Value::String(s)) => Ok(s),
            _ => Err(DescriptorError::MissingField(field)),
        }
    }
}

#[async_trait]
impl Package for JsonPackage {
    async fn name(&self) -> Result<PackageName, DescriptorError> {
        let name = self.string_field("name")?;
        PackageName::parse(&name).map_err(DescriptorError::from)
    }

    async fn version(&self) -> Result<Version, DescriptorError> {
        self.string_field("version").map(Version::from)
    }

    async fn json(&self) -> Result<Map<String, Value>, DescriptorError> {
        self.parse()
    }
}
