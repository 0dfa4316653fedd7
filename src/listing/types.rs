//! Listing data model: entries, groups and output units

use chrono::{DateTime, Utc};

use crate::cid::ContentId;
use crate::store::{StoreEntry, codes};

/// Kind of a listed child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    /// A sharded directory; lists and renders like a directory.
    HamtShard,
    Symlink,
    /// Unresolved or unrecognized type.
    Unknown,
}

impl EntryKind {
    /// Map a store type code. Unrecognized or missing codes are `Unknown`,
    /// never an error.
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(codes::RAW | codes::FILE) => EntryKind::File,
            Some(codes::DIRECTORY) => EntryKind::Directory,
            Some(codes::HAMT_SHARD) => EntryKind::HamtShard,
            Some(codes::SYMLINK) => EntryKind::Symlink,
            _ => EntryKind::Unknown,
        }
    }

    pub fn is_directory_like(&self) -> bool {
        matches!(self, EntryKind::Directory | EntryKind::HamtShard)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::HamtShard => "hamt-shard",
            EntryKind::Symlink => "symlink",
            EntryKind::Unknown => "unknown",
        }
    }
}

/// One child of a listed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub name: String,
    pub cid: ContentId,
    /// Byte count. Zero when the store did not resolve the child.
    pub size: u64,
    pub kind: EntryKind,
    /// Present only for symlinks.
    pub symlink_target: Option<String>,
    pub mode: Option<u32>,
    pub mtime: Option<DateTime<Utc>>,
}

impl EntryRecord {
    pub fn new(name: impl Into<String>, cid: ContentId, size: u64, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            cid,
            size,
            kind,
            symlink_target: None,
            mode: None,
            mtime: None,
        }
    }
}

impl From<StoreEntry> for EntryRecord {
    fn from(entry: StoreEntry) -> Self {
        let kind = EntryKind::from_code(entry.type_code);
        Self {
            name: entry.name,
            cid: entry.cid,
            size: entry.size,
            kind,
            symlink_target: if kind == EntryKind::Symlink {
                entry.target
            } else {
                None
            },
            mode: entry.mode,
            mtime: entry.mtime,
        }
    }
}

/// Full or partial listing of one requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResult {
    /// The path string as requested; used for grouping and display.
    pub group_key: String,
    pub entries: Vec<EntryRecord>,
}

impl GroupResult {
    pub fn new(group_key: impl Into<String>, entries: Vec<EntryRecord>) -> Self {
        Self {
            group_key: group_key.into(),
            entries,
        }
    }
}

/// A batch of groups delivered to a sink in one piece.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputUnit {
    pub groups: Vec<GroupResult>,
}

impl OutputUnit {
    pub fn new(groups: Vec<GroupResult>) -> Self {
        Self { groups }
    }

    /// A unit carrying exactly one entry of one group.
    pub fn single(group_key: impl Into<String>, entry: EntryRecord) -> Self {
        Self {
            groups: vec![GroupResult::new(group_key, vec![entry])],
        }
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}
