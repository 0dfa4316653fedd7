//! Aggregation policies: what to emit, and when
//!
//! - `Streaming`: one unit per entry, emitted on arrival
//! - `Batch`: buffer each path, sort by name, emit everything once at the end

use std::mem;

use crate::error::ListError;

use super::sink::UnitSink;
use super::types::{EntryRecord, GroupResult, OutputUnit};

/// Accumulated state of a batch run.
#[derive(Debug, Default)]
pub struct BatchState {
    groups: Vec<GroupResult>,
    pending: Vec<EntryRecord>,
}

/// Aggregation policy, chosen once per run.
#[derive(Debug)]
pub enum AggregationPolicy {
    Streaming,
    Batch(BatchState),
}

impl AggregationPolicy {
    pub fn streaming() -> Self {
        AggregationPolicy::Streaming
    }

    /// Batch policy for a run over `paths`. Every path gets a group, in
    /// request order, even if it ends up with no entries.
    pub fn batch(paths: &[String]) -> Self {
        AggregationPolicy::Batch(BatchState {
            groups: paths
                .iter()
                .map(|p| GroupResult::new(p.clone(), Vec::new()))
                .collect(),
            pending: Vec::new(),
        })
    }

    /// Handle one entry of the group currently being traversed.
    pub fn on_entry<S: UnitSink + ?Sized>(
        &mut self,
        group_key: &str,
        entry: EntryRecord,
        sink: &mut S,
    ) -> Result<(), ListError> {
        match self {
            AggregationPolicy::Streaming => sink.emit(OutputUnit::single(group_key, entry)),
            AggregationPolicy::Batch(state) => {
                state.pending.push(entry);
                Ok(())
            }
        }
    }

    /// The group at `index` finished traversing successfully.
    pub fn on_group_complete(&mut self, index: usize, group_key: &str) {
        if let AggregationPolicy::Batch(state) = self {
            let mut entries = mem::take(&mut state.pending);
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            let group = GroupResult::new(group_key, entries);
            match state.groups.get_mut(index) {
                Some(slot) => *slot = group,
                None => state.groups.push(group),
            }
        }
    }

    /// Every group finished; emit whatever the policy held back.
    pub fn on_run_complete<S: UnitSink + ?Sized>(self, sink: &mut S) -> Result<(), ListError> {
        match self {
            AggregationPolicy::Streaming => Ok(()),
            AggregationPolicy::Batch(state) => sink.emit(OutputUnit::new(state.groups)),
        }
    }
}
