//! Shared types for the Composer package registry.
//!
//! These newtypes are used by both the registry core and the maintainer CLI,
//! so that package names, versions and storage keys never travel around as
//! bare strings.

pub mod key;
pub mod types;

// Re-exports
pub use key::{Key, KeyError};
pub use types::*;

/// Root attribute of a Composer `packages.json` document.
pub const PACKAGES_ATTRIBUTE: &str = "packages";

/// Storage key of the registry index when none is configured.
pub const DEFAULT_INDEX_KEY: &str = "packages.json";
