//! Directory listing engine
//!
//! This module turns requested paths into output units. It supports two
//! aggregation policies sharing one traversal core:
//!
//! - Streaming: one unit per entry, emitted as soon as it is traversed
//! - Batch: one unit for the whole run, each group sorted by name

mod config;
mod driver;
mod invoker;
mod policy;
mod sink;
mod types;

pub use config::ListConfig;
pub use driver::Lister;
pub use invoker::Traversal;
pub use policy::{AggregationPolicy, BatchState};
pub use sink::UnitSink;
pub use types::{EntryKind, EntryRecord, GroupResult, OutputUnit};
