//! Storage keys.
//!
//! A [`Key`] is a relative, `/`-separated path identifying one stored blob
//! (e.g. `packages.json` or `p/acme/widget.json`). Backends map it onto their
//! own namespace, so a key must never be able to climb out of it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Errors that can occur when validating a [`Key`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    /// The key is empty.
    #[error("Empty storage key")]
    Empty,

    /// The key contains an empty, `.` or `..` segment.
    #[error("Invalid storage key '{key}': bad segment '{segment}'")]
    Segment {
        /// The rejected key.
        key: String,
        /// The offending segment.
        segment: String,
    },
}

/// A validated, path-like storage key.
///
/// # Example
///
/// ```
/// use composer_schema::Key;
///
/// let key = Key::new("p/acme").unwrap().join("widget.json").unwrap();
/// assert_eq!(key.as_str(), "p/acme/widget.json");
/// assert!(Key::new("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key(String);

impl Key {
    /// Create a new `Key`, validating every segment.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Empty`] for an empty string and
    /// [`KeyError::Segment`] if any segment is empty, `.` or `..`.
    pub fn new(s: &str) -> Result<Self, KeyError> {
        if s.is_empty() {
            return Err(KeyError::Empty);
        }
        if let Some(bad) = s
            .split('/')
            .find(|seg| seg.is_empty() || *seg == "." || *seg == "..")
        {
            return Err(KeyError::Segment {
                key: s.to_string(),
                segment: bad.to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Append `child` (which may itself contain `/`) to this key.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if `child` is not a valid key on its own.
    pub fn join(&self, child: &str) -> Result<Self, KeyError> {
        let child = Self::new(child)?;
        Ok(Self(format!("{}/{}", self.0, child.0)))
    }

    /// Iterate over the `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Convert to a relative filesystem path.
    pub fn to_path(&self) -> PathBuf {
        self.segments().collect()
    }

    /// Return the raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Key {
    type Error = KeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
