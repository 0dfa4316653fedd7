//! Configuration for listing runs

use crate::store::LsOptions;

/// Configuration for one listing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    /// Resolve linked objects to find out their types.
    pub resolve_type: bool,
    /// Resolve linked objects to find out their file size.
    pub resolve_size: bool,
    /// Emit entries as they are traversed instead of one sorted batch.
    pub streaming: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            resolve_type: true,
            resolve_size: true,
            streaming: false,
        }
    }
}

impl ListConfig {
    /// Store options for this run.
    ///
    /// Both resolution flags map onto the single `resolve_children` switch:
    /// asking for either type or size fetches every child.
    pub fn ls_options(&self) -> LsOptions {
        LsOptions {
            resolve_children: self.resolve_type || self.resolve_size,
        }
    }
}
