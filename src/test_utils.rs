//! Test utilities for building directory trees and stores.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::store::{Link, MemoryStore};

/// A temporary directory tree for import and CLI tests.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Add a symlink at `path` pointing to `target`.
    #[cfg(unix)]
    pub fn add_symlink(&self, path: &str, target: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A store with `n` files named `file-0000`.. in one directory, linked from
/// the root as `wide`, in reverse name order.
pub fn wide_store(n: usize) -> MemoryStore {
    let mut store = MemoryStore::new();
    let mut links: Vec<Link> = (0..n)
        .map(|i| {
            let name = format!("file-{:04}", i);
            let cid = store.put_file(name.as_bytes());
            Link::new(name, cid)
        })
        .collect();
    links.reverse();
    let wide = store.put_directory(links);
    let root = store.put_directory(vec![Link::new("wide", wide)]);
    store.set_root(root);
    store
}
