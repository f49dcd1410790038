//! Temporary vault trees for lens-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A throwaway directory tree that `.lens.toml` files can be dropped into.
pub struct TestDir {
    /// Removed when the helper is dropped.
    root: TempDir,
}

impl TestDir {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Returns the top of the tree.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates `rel_path` (and its parents) under the tree and returns it.
    pub fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Drops a `.lens.toml` that sets nothing into `rel_path`.
    pub fn create_config(&self, rel_path: &str) -> PathBuf {
        self.create_config_with_content(rel_path, "# no settings\n")
    }

    /// Drops a `.lens.toml` with `content` into `rel_path`.
    pub fn create_config_with_content(&self, rel_path: &str, content: &str) -> PathBuf {
        let config = self.create_dir(rel_path).join(CONFIG_FILENAME);
        fs::write(&config, content).unwrap();
        config
    }

    /// Drops a `.lens.toml` that ends discovery into `rel_path`.
    pub fn create_root_config(&self, rel_path: &str) -> PathBuf {
        self.create_config_with_content(rel_path, "root = true\n")
    }
}
