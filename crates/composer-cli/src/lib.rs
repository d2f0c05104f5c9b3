//! composer-registry - maintain a Composer `packages.json` registry
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! # Overview
//!
//! The registry is a single JSON document mapping package names to their
//! versions, each with the `composer.json` metadata of that version. This
//! tool creates it, adds package versions to it and prints it.
//!
//! # Storage Layout
//!
//! ```text
//! <root>/
//! ├── packages.json          # Registry index (all packages)
//! └── p/<vendor>/<project>.json  # One document per package
//! ```

pub mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use composer_core::RegistryConfig;
use composer_core::config::{INDEX_ENV, ROOT_ENV};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "composer-registry")]
#[command(author, version, about = "Maintain a Composer packages.json registry")]
pub struct Cli {
    /// Storage root directory [env: COMPOSER_REGISTRY_ROOT]
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Index key inside the storage root [env: COMPOSER_REGISTRY_INDEX] [default: packages.json]
    #[arg(long, global = true)]
    pub index: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve the registry configuration. Flags win over the environment,
    /// which wins over the defaults.
    pub fn config(&self) -> Result<RegistryConfig> {
        RegistryConfig::from_lookup(|name| {
            let flag = match name {
                ROOT_ENV => self.root.clone().map(PathBuf::into_os_string),
                INDEX_ENV => self.index.clone().map(OsString::from),
                _ => None,
            };
            flag.or_else(|| std::env::var_os(name))
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an empty registry
    Init {
        /// Replace an existing registry
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Add package versions from composer.json files
    Add {
        /// Paths to composer.json files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the registry
    Show {
        /// Only print the versions of this package
        #[arg(long, short = 'p')]
        package: Option<String>,
    },
}
