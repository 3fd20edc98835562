#![deny(clippy::uninlined_format_args)]
#![deny(clippy::unwrap_used)]
#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

//! Core three-way reconciliation engine for synchronizing a working tree
//! with an object-store prefix.
//!
//! The crate is organized leaf-first, mirroring the component table this
//! tool is built from: [`fingerprint`] and [`inventory`] are the data
//! model, [`walker`] turns a directory into an [`inventory::Inventory`],
//! [`store`] is the transport boundary, [`classify`] and [`resolve`] are
//! the pure reconciliation core, and [`ops`] composes all of the above
//! into one function per CLI command.

pub mod classify;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod inventory;
pub mod ops;
pub mod resolve;
pub mod store;
pub mod walker;

use std::path::PathBuf;

use color_eyre::eyre::Result;

/// Get the current home directory for the current user.
///
/// This is a convenience function for `std::env::var("HOME")` or
/// `std::env::var("USERPROFILE")`.
fn homedir() -> Result<PathBuf, std::env::VarError> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
}

/// The directory name, relative to a working root, that holds all
/// tool-owned state (`config`, `local`, `stash/`).
pub const DAT_DIR: &str = ".dat";

/// The file name, relative to `.dat/`, holding the persisted config.
pub const CONFIG_FILE: &str = "config";

/// The file name, relative to `.dat/`, holding the last-synchronized
/// snapshot.
pub const LOCAL_FILE: &str = "local";

/// The directory name, relative to `.dat/`, holding stashed conflicts.
pub const STASH_DIR: &str = "stash";

/// Paths to the tool-owned files under a given working root.
#[derive(Debug, Clone)]
pub struct RepoPaths {
    /// The working root (the directory containing `.dat/`).
    pub root: PathBuf,
}

impl RepoPaths {
    /// Build paths rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The `.dat/` directory itself.
    pub fn dat_dir(&self) -> PathBuf {
        self.root.join(DAT_DIR)
    }

    /// The `.dat/config` file.
    pub fn config(&self) -> PathBuf {
        self.dat_dir().join(CONFIG_FILE)
    }

    /// The `.dat/local` file.
    pub fn local(&self) -> PathBuf {
        self.dat_dir().join(LOCAL_FILE)
    }

    /// The `.dat/stash/` directory.
    pub fn stash(&self) -> PathBuf {
        self.dat_dir().join(STASH_DIR)
    }

    /// The working root to walk, honoring a configured `subdir`.
    pub fn walk_root(&self, subdir: Option<&str>) -> PathBuf {
        match subdir {
            Some(subdir) if !subdir.is_empty() => self.root.join(subdir),
            _ => self.root.clone(),
        }
    }
}
