//! Import a local directory tree into a [`MemoryStore`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use glob::Pattern;
use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::cid::ContentId;
use crate::error::StoreError;

use super::memory::{Link, MemoryStore, Node};

/// Configuration for importing a local directory.
#[derive(Debug, Clone, Default)]
pub struct ImportConfig {
    /// Include hidden and gitignored files.
    pub show_all: bool,
    pub ignore_patterns: Vec<String>,
    /// Number of parallel workers for file hashing.
    /// 0 = auto-detect (use all available cores)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub parallel_workers: usize,
}

#[derive(Debug)]
struct PendingFile {
    path: PathBuf,
    parent: PathBuf,
    name: String,
}

/// Builds a content-addressed store from the local filesystem.
pub struct Importer {
    config: ImportConfig,
}

impl Importer {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Import `root` and return a store whose root is the imported directory.
    pub fn import(&self, root: &Path) -> Result<MemoryStore, StoreError> {
        if !root.is_dir() {
            return Err(StoreError::NotADirectory(root.display().to_string()));
        }

        let mut store = MemoryStore::new();
        let mut dirs: Vec<PathBuf> = vec![root.to_path_buf()];
        let mut files: Vec<PendingFile> = Vec::new();
        let mut children: BTreeMap<PathBuf, Vec<Link>> = BTreeMap::new();

        let patterns = self.config.ignore_patterns.clone();
        let walker = WalkBuilder::new(root)
            .hidden(!self.config.show_all)
            .ignore(!self.config.show_all)
            .git_ignore(!self.config.show_all)
            .git_global(!self.config.show_all)
            .git_exclude(!self.config.show_all)
            .require_git(false)
            .follow_links(false)
            .filter_entry(move |entry| !should_ignore_path(entry.path(), &patterns))
            .build();

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let path = entry.path().to_path_buf();
            let Some(parent) = path.parent().map(Path::to_path_buf) else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_symlink() {
                match fs::read_link(&path) {
                    Ok(target) => {
                        let id = store.put_symlink(target.to_string_lossy().to_string());
                        children.entry(parent).or_default().push(Link::new(name, id));
                    }
                    Err(e) => tracing::warn!("skipping symlink {}: {}", path.display(), e),
                }
            } else if file_type.is_dir() {
                dirs.push(path);
            } else if file_type.is_file() {
                files.push(PendingFile { path, parent, name });
            }
        }

        tracing::debug!(
            files = files.len(),
            dirs = dirs.len(),
            "hashing imported tree"
        );

        for (file, node) in self.hash_files(&files) {
            match node {
                Ok(node) => {
                    let id = store.insert(node);
                    children
                        .entry(file.parent.clone())
                        .or_default()
                        .push(Link::new(file.name.clone(), id));
                }
                Err(e) => tracing::warn!("skipping file {}: {}", file.path.display(), e),
            }
        }

        // Children before parents: deepest directories first.
        dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
        let mut root_id = None;
        for dir in dirs {
            let mut links = children.remove(&dir).unwrap_or_default();
            links.sort_by(|a, b| a.name.cmp(&b.name));
            let (mode, mtime) = fs::metadata(&dir)
                .map(|m| (file_mode(&m), file_mtime(&m)))
                .unwrap_or((None, None));
            let id = store.insert(Node::Directory {
                links,
                sharded: false,
                mode,
                mtime,
            });

            if dir == root {
                root_id = Some(id);
            } else if let Some(parent) = dir.parent() {
                let name = dir
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                children
                    .entry(parent.to_path_buf())
                    .or_default()
                    .push(Link::new(name, id));
            }
        }

        if let Some(id) = root_id {
            store.set_root(id);
        }
        Ok(store)
    }

    /// Hash file contents, in parallel unless a single worker was requested.
    fn hash_files<'a>(
        &self,
        files: &'a [PendingFile],
    ) -> Vec<(&'a PendingFile, io::Result<Node>)> {
        let hash_all = || {
            files
                .par_iter()
                .map(|f| (f, hash_file(&f.path)))
                .collect::<Vec<_>>()
        };

        match self.config.parallel_workers {
            1 => files.iter().map(|f| (f, hash_file(&f.path))).collect(),
            0 => hash_all(),
            n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(hash_all),
                // Fall back to rayon's global pool if custom pool creation fails
                Err(_) => hash_all(),
            },
        }
    }
}

fn hash_file(path: &Path) -> io::Result<Node> {
    let meta = fs::metadata(path)?;
    let mut file = fs::File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let size = io::copy(&mut file, &mut hasher)?;
    Ok(Node::File {
        digest: ContentId::from_bytes(*hasher.finalize().as_bytes()),
        size,
        mode: file_mode(&meta),
        mtime: file_mtime(&meta),
    })
}

#[cfg(unix)]
fn file_mode(meta: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn file_mode(_meta: &fs::Metadata) -> Option<u32> {
    None
}

fn file_mtime(meta: &fs::Metadata) -> Option<DateTime<Utc>> {
    meta.modified().ok().map(DateTime::<Utc>::from)
}

/// Check if a path should be ignored based on name and ignore patterns.
fn should_ignore_path(path: &Path, ignore_patterns: &[String]) -> bool {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    // Always ignore .git directory
    if name == ".git" {
        return true;
    }

    ignore_patterns
        .iter()
        .any(|pattern| name == *pattern || glob_match(pattern, &name))
}

fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}
