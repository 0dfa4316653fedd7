//! dagls - list directories of a content-addressed filesystem
//!
//! Paths are resolved against a [`Store`](store::Store), their entries are
//! aggregated by the [`listing`] engine (streamed as they arrive, or sorted
//! and emitted once), and the resulting output units are rendered by
//! [`output`] as aligned text or JSON.

pub mod cancel;
pub mod cid;
pub mod error;
pub mod listing;
pub mod output;
pub mod store;
pub mod string_utils;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use cancel::{CancelScope, CancelToken};
pub use cid::{CidBase, ContentId};
pub use error::{ListError, StoreError};
pub use listing::{
    AggregationPolicy, EntryKind, EntryRecord, GroupResult, ListConfig, Lister, OutputUnit,
    UnitSink,
};
pub use output::{
    JsonSink, OutputConfig, OutputFormat, TableConfig, TabularRenderer, TextSink, format_size,
    render,
};
pub use store::{ImportConfig, Importer, MemoryStore, Store};
