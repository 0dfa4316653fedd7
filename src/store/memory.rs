//! In-memory content-addressed store
//!
//! Objects are keyed by the hash of their canonical encoding, so equal
//! content always lands on the same identifier. Used by the CLI (after a
//! local import or snapshot load) and throughout the tests.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::cid::ContentId;
use crate::error::StoreError;

use super::{LsOptions, Store, StoreEntry, codes};

/// A named reference from a directory to a child object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub cid: ContentId,
}

impl Link {
    pub fn new(name: impl Into<String>, cid: ContentId) -> Self {
        Self {
            name: name.into(),
            cid,
        }
    }
}

/// One stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    File {
        /// Hash of the file's bytes.
        digest: ContentId,
        size: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mtime: Option<DateTime<Utc>>,
    },
    Directory {
        links: Vec<Link>,
        /// Sharded directories list exactly like plain ones but report a
        /// distinct type code.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        sharded: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mtime: Option<DateTime<Utc>>,
    },
    Symlink {
        target: String,
    },
}

impl Node {
    /// Compute this node's identifier from its canonical encoding.
    pub fn id(&self) -> ContentId {
        let mut hasher = blake3::Hasher::new();
        match self {
            Node::File {
                digest,
                size,
                mode,
                mtime,
            } => {
                hasher.update(b"file\0");
                hasher.update(digest.as_bytes());
                hasher.update(&size.to_le_bytes());
                hash_metadata(&mut hasher, *mode, *mtime);
            }
            Node::Directory {
                links,
                sharded,
                mode,
                mtime,
            } => {
                hasher.update(if *sharded { b"hamt\0" } else { b"dir\0\0" });
                hasher.update(&(links.len() as u64).to_le_bytes());
                for link in links {
                    hasher.update(&(link.name.len() as u64).to_le_bytes());
                    hasher.update(link.name.as_bytes());
                    hasher.update(link.cid.as_bytes());
                }
                hash_metadata(&mut hasher, *mode, *mtime);
            }
            Node::Symlink { target } => {
                hasher.update(b"link\0");
                hasher.update(target.as_bytes());
            }
        }
        ContentId::from_bytes(*hasher.finalize().as_bytes())
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }
}

fn hash_metadata(hasher: &mut blake3::Hasher, mode: Option<u32>, mtime: Option<DateTime<Utc>>) {
    match mode {
        Some(m) => {
            hasher.update(&[1]);
            hasher.update(&m.to_le_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
    match mtime {
        Some(t) => {
            hasher.update(&[1]);
            hasher.update(&t.timestamp().to_le_bytes());
            hasher.update(&t.timestamp_subsec_nanos().to_le_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

/// Serializable form of a whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<ContentId>,
    pub objects: BTreeMap<ContentId, Node>,
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: HashMap<ContentId, Node>,
    root: Option<ContentId>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every listed entry by `latency`, simulating a slow fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert(&mut self, node: Node) -> ContentId {
        let id = node.id();
        self.objects.insert(id, node);
        id
    }

    pub fn put_file(&mut self, data: &[u8]) -> ContentId {
        self.insert(Node::File {
            digest: ContentId::digest(data),
            size: data.len() as u64,
            mode: None,
            mtime: None,
        })
    }

    pub fn put_symlink(&mut self, target: impl Into<String>) -> ContentId {
        self.insert(Node::Symlink {
            target: target.into(),
        })
    }

    pub fn put_directory(&mut self, links: Vec<Link>) -> ContentId {
        self.insert(Node::Directory {
            links,
            sharded: false,
            mode: None,
            mtime: None,
        })
    }

    pub fn put_sharded_directory(&mut self, links: Vec<Link>) -> ContentId {
        self.insert(Node::Directory {
            links,
            sharded: true,
            mode: None,
            mtime: None,
        })
    }

    /// Set the directory that root-relative paths resolve from.
    pub fn set_root(&mut self, root: ContentId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<ContentId> {
        self.root
    }

    pub fn get(&self, id: &ContentId) -> Option<&Node> {
        self.objects.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Resolve a path to the object it names.
    ///
    /// Accepted forms: `<cid>[/sub/path]`, `/ipfs/<cid>[/sub/path]`, or a
    /// path relative to the root (`.`, `src/lib`, `/docs`).
    pub fn resolve(&self, path: &str) -> Result<(ContentId, &Node), StoreError> {
        let trimmed = path.strip_prefix("/ipfs/").unwrap_or(path);
        let mut segments = trimmed
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .peekable();

        let mut current = match segments.peek().and_then(|s| ContentId::parse(s)) {
            Some(id) => {
                segments.next();
                id
            }
            None => self.root.ok_or(StoreError::NoRoot)?,
        };
        let mut node = self.fetch(&current, path)?;

        for segment in segments {
            let Node::Directory { links, .. } = node else {
                return Err(StoreError::NotADirectory(path.to_string()));
            };
            let link = links
                .iter()
                .find(|l| l.name == segment)
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
            current = link.cid;
            node = self.fetch(&current, path)?;
        }

        Ok((current, node))
    }

    fn fetch(&self, id: &ContentId, path: &str) -> Result<&Node, StoreError> {
        self.objects
            .get(id)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn resolve_link(&self, link: &Link) -> Result<StoreEntry, StoreError> {
        let node = self.fetch(&link.cid, &link.name)?;
        let mut entry = StoreEntry::unresolved(link.name.clone(), link.cid);
        match node {
            Node::File {
                size, mode, mtime, ..
            } => {
                entry.type_code = Some(codes::FILE);
                entry.size = *size;
                entry.mode = *mode;
                entry.mtime = *mtime;
            }
            Node::Directory {
                sharded,
                mode,
                mtime,
                ..
            } => {
                entry.type_code = Some(if *sharded {
                    codes::HAMT_SHARD
                } else {
                    codes::DIRECTORY
                });
                entry.mode = *mode;
                entry.mtime = *mtime;
            }
            Node::Symlink { target } => {
                entry.type_code = Some(codes::SYMLINK);
                entry.size = target.len() as u64;
                entry.target = Some(target.clone());
            }
        }
        Ok(entry)
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            root: self.root,
            objects: self
                .objects
                .iter()
                .map(|(id, node)| (*id, node.clone()))
                .collect(),
        }
    }

    /// Rebuild a store from a snapshot, verifying every identifier.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for (id, node) in snapshot.objects {
            if node.id() != id {
                return Err(StoreError::Snapshot(format!(
                    "object {} does not match its content",
                    id
                )));
            }
            store.objects.insert(id, node);
        }
        if let Some(root) = snapshot.root {
            match store.objects.get(&root) {
                Some(node) if node.is_directory() => store.root = Some(root),
                Some(_) => {
                    return Err(StoreError::Snapshot(format!(
                        "root {} is not a directory",
                        root
                    )));
                }
                None => {
                    return Err(StoreError::Snapshot(format!("root {} is missing", root)));
                }
            }
        }
        Ok(store)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let data = fs::read(path)?;
        let snapshot: Snapshot = serde_json::from_slice(&data)?;
        Self::from_snapshot(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.to_snapshot())?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ls(
        &self,
        path: &str,
        options: LsOptions,
        out: mpsc::Sender<StoreEntry>,
    ) -> Result<(), StoreError> {
        let (_, node) = self.resolve(path)?;
        let Node::Directory { links, .. } = node else {
            return Err(StoreError::NotADirectory(path.to_string()));
        };

        for link in links {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            let entry = if options.resolve_children {
                self.resolve_link(link)?
            } else {
                StoreEntry::unresolved(link.name.clone(), link.cid)
            };
            out.send(entry).await.map_err(|_| StoreError::FeedClosed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MemoryStore, ContentId, ContentId) {
        let mut store = MemoryStore::new();
        let readme = store.put_file(b"hello");
        let link = store.put_symlink("README");
        let lib = store.put_file(b"pub fn f() {}");
        let src = store.put_directory(vec![Link::new("lib.rs", lib)]);
        let root = store.put_directory(vec![
            Link::new("src", src),
            Link::new("README", readme),
            Link::new("latest", link),
        ]);
        store.set_root(root);
        (store, root, src)
    }

    async fn list(store: &MemoryStore, path: &str, resolve: bool) -> Result<Vec<StoreEntry>, StoreError> {
        let (tx, mut rx) = mpsc::channel(16);
        store
            .ls(path, LsOptions { resolve_children: resolve }, tx)
            .await?;
        let mut entries = Vec::new();
        while let Some(e) = rx.recv().await {
            entries.push(e);
        }
        Ok(entries)
    }

    #[test]
    fn test_identical_content_shares_id() {
        let mut store = MemoryStore::new();
        let a = store.put_file(b"same");
        let b = store.put_file(b"same");
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_resolve_forms() {
        let (store, root, src) = sample();
        assert_eq!(store.resolve(".").unwrap().0, root);
        assert_eq!(store.resolve("").unwrap().0, root);
        assert_eq!(store.resolve("/src").unwrap().0, src);
        assert_eq!(store.resolve("src/").unwrap().0, src);
        assert_eq!(store.resolve(&root.to_string()).unwrap().0, root);
        assert_eq!(store.resolve(&format!("/ipfs/{}/src", root)).unwrap().0, src);
        assert_eq!(store.resolve(&src.to_string()).unwrap().0, src);
    }

    #[test]
    fn test_resolve_errors() {
        let (store, _, _) = sample();
        assert!(matches!(store.resolve("nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.resolve("README/inner"),
            Err(StoreError::NotADirectory(_))
        ));
        assert!(matches!(
            MemoryStore::new().resolve("."),
            Err(StoreError::NoRoot)
        ));
    }

    #[tokio::test]
    async fn test_ls_resolved_preserves_link_order() {
        let (store, _, src) = sample();
        let entries = list(&store, ".", true).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["src", "README", "latest"]);

        assert_eq!(entries[0].type_code, Some(codes::DIRECTORY));
        assert_eq!(entries[0].cid, src);
        assert_eq!(entries[0].size, 0);
        assert_eq!(entries[1].type_code, Some(codes::FILE));
        assert_eq!(entries[1].size, 5);
        assert_eq!(entries[2].type_code, Some(codes::SYMLINK));
        assert_eq!(entries[2].target.as_deref(), Some("README"));
    }

    #[tokio::test]
    async fn test_ls_unresolved_has_no_metadata() {
        let (store, _, _) = sample();
        let entries = list(&store, ".", false).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.type_code.is_none() && e.size == 0));
        assert!(entries.iter().all(|e| e.target.is_none()));
    }

    #[tokio::test]
    async fn test_ls_file_is_not_a_directory() {
        let (store, _, _) = sample();
        let err = list(&store, "README", true).await.unwrap_err();
        assert!(matches!(err, StoreError::NotADirectory(_)));
    }

    #[tokio::test]
    async fn test_ls_sharded_directory_code() {
        let mut store = MemoryStore::new();
        let file = store.put_file(b"x");
        let shard = store.put_sharded_directory(vec![Link::new("x", file)]);
        let root = store.put_directory(vec![Link::new("big", shard)]);
        store.set_root(root);

        let entries = list(&store, ".", true).await.unwrap();
        assert_eq!(entries[0].type_code, Some(codes::HAMT_SHARD));
        let inner = list(&store, "big", true).await.unwrap();
        assert_eq!(inner[0].name, "x");
    }

    #[tokio::test]
    async fn test_ls_missing_child_fails_only_when_resolving() {
        let mut store = MemoryStore::new();
        let dangling = ContentId::digest(b"never stored");
        let root = store.put_directory(vec![Link::new("ghost", dangling)]);
        store.set_root(root);

        assert_eq!(list(&store, ".", false).await.unwrap().len(), 1);
        assert!(matches!(
            list(&store, ".", true).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_snapshot_rejects_tampered_object() {
        let (store, _, _) = sample();
        let mut snapshot = store.to_snapshot();
        let (id, _) = snapshot
            .objects
            .iter()
            .find(|(_, n)| matches!(n, Node::Symlink { .. }))
            .map(|(id, n)| (*id, n.clone()))
            .unwrap();
        snapshot.objects.insert(
            id,
            Node::Symlink {
                target: "elsewhere".to_string(),
            },
        );
        assert!(matches!(
            MemoryStore::from_snapshot(snapshot),
            Err(StoreError::Snapshot(_))
        ));
    }

    #[test]
    fn test_snapshot_save_and_load() {
        let (store, root, _) = sample();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        store.save(&path).unwrap();

        let loaded = MemoryStore::load(&path).unwrap();
        assert_eq!(loaded.root(), Some(root));
        assert_eq!(loaded.len(), store.len());
    }
}
