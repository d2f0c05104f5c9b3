//! Package name and version newtypes.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Errors that can occur when validating a [`PackageName`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum NameError {
    /// The name is empty.
    #[error("Empty package name")]
    Empty,

    /// The name is not in `vendor/project` format.
    #[error("Invalid package name: expected 'vendor/project', got '{0}'")]
    Format(String),
}

/// A Composer package name (e.g. `acme/widget`).
///
/// Names are kept exactly as given. Registry keys are compared byte for byte,
/// so `Acme/Widget` and `acme/widget` are two different entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Wrap a name without validation (for index/deserialized data).
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Create a validated name in `vendor/project` format.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Empty`] for an empty string and
    /// [`NameError::Format`] if `s` does not have exactly one `/` separating
    /// two non-empty parts.
    pub fn parse(s: &str) -> Result<Self, NameError> {
        if s.is_empty() {
            return Err(NameError::Empty);
        }
        match s.split_once('/') {
            Some((vendor, project))
                if !vendor.is_empty() && !project.is_empty() && !project.contains('/') =>
            {
                Ok(Self(s.to_string()))
            }
            _ => Err(NameError::Format(s.to_string())),
        }
    }

    /// Get the vendor part, if the name has one.
    pub fn vendor(&self) -> Option<&str> {
        self.0.split_once('/').map(|(vendor, _)| vendor)
    }

    /// Get the project part (the whole name when there is no vendor).
    pub fn project(&self) -> &str {
        self.0.split_once('/').map_or(self.0.as_str(), |(_, project)| project)
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A package version string (e.g. `1.0.0`, `dev-main`).
///
/// Stored as-is. The registry never interprets version strings, it only uses
/// them as keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Create a new version from the given string (stored as-is).
    pub fn new(v: impl Into<String>) -> Self {
        Self(v.into())
    }

    /// Return the version string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for Version {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vendor_project() {
        let name = PackageName::parse("acme/widget").unwrap();
        assert_eq!(name.vendor(), Some("acme"));
        assert_eq!(name.project(), "widget");
        assert_eq!(name, "acme/widget");
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        assert_eq!(PackageName::parse(""), Err(NameError::Empty));
        assert!(PackageName::parse("widget").is_err());
        assert!(PackageName::parse("/widget").is_err());
        assert!(PackageName::parse("acme/").is_err());
        assert!(PackageName::parse("acme/widget/extra").is_err());
    }

    #[test]
    fn test_name_is_not_case_folded() {
        let name = PackageName::new("Acme/Widget");
        assert_eq!(name.as_str(), "Acme/Widget");
        assert_ne!(name, PackageName::new("acme/widget"));
    }

    #[test]
    fn test_unvalidated_name_without_vendor() {
        let name = PackageName::new("widget");
        assert_eq!(name.vendor(), None);
        assert_eq!(name.project(), "widget");
    }

    #[test]
    fn test_serde_transparent() {
        let version = Version::new("1.0.0");
        assert_eq!(serde_json::to_string(&version).unwrap(), "\"1.0.0\"");
        let name: PackageName = serde_json::from_str("\"acme/widget\"").unwrap();
        assert_eq!(name, "acme/widget");
    }
}
