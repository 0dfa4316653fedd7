//! Content-addressed store access
//!
//! The listing engine never talks to storage directly. It calls a [`Store`],
//! which resolves a path and pushes the immediate children of the resolved
//! directory into a feed.
//!
//! - `memory` - in-memory content-addressed store with snapshot support
//! - `import` - builds a `MemoryStore` from a local directory

mod import;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::cid::ContentId;
use crate::error::StoreError;

pub use import::{ImportConfig, Importer};
pub use memory::{Link, MemoryStore, Node, Snapshot};

/// UnixFS-style object type codes reported by stores.
pub mod codes {
    pub const RAW: i32 = 0;
    pub const DIRECTORY: i32 = 1;
    pub const FILE: i32 = 2;
    pub const METADATA: i32 = 3;
    pub const SYMLINK: i32 = 4;
    pub const HAMT_SHARD: i32 = 5;
}

/// How eagerly child metadata is fetched while listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LsOptions {
    /// Fetch every child to learn its type, size, target, mode and mtime.
    /// When false, entries carry only name and identifier.
    pub resolve_children: bool,
}

/// One child as reported by a store, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub name: String,
    pub cid: ContentId,
    pub size: u64,
    /// `None` when the child was not resolved.
    pub type_code: Option<i32>,
    pub target: Option<String>,
    pub mode: Option<u32>,
    pub mtime: Option<DateTime<Utc>>,
}

impl StoreEntry {
    /// An entry known only through its parent's link.
    pub fn unresolved(name: impl Into<String>, cid: ContentId) -> Self {
        Self {
            name: name.into(),
            cid,
            size: 0,
            type_code: None,
            target: None,
            mode: None,
            mtime: None,
        }
    }
}

/// Traversal capability over a content-addressed filesystem.
#[async_trait]
pub trait Store: Send + Sync {
    /// Resolve `path` to a directory and send each immediate child into `out`
    /// in traversal order. Returns once every child has been sent.
    async fn ls(
        &self,
        path: &str,
        options: LsOptions,
        out: mpsc::Sender<StoreEntry>,
    ) -> Result<(), StoreError>;
}
