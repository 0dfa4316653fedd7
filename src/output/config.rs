//! Output configuration types

use clap::ValueEnum;

use crate::cid::CidBase;

/// Minimum column width when rows arrive incrementally and true alignment
/// cannot be computed up front.
const STREAMING_MIN_TAB_WIDTH: usize = 10;
const BATCH_MIN_TAB_WIDTH: usize = 1;

/// Spacing added after the widest cell of a column.
pub const TAB_PADDING: usize = 1;

/// Output encoding selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for tabular text rendering.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Print a header row at the start of each group
    pub headers: bool,
    /// Include the size column
    pub size_column: bool,
    /// Render sizes as `1.5K` instead of raw byte counts
    pub human_sizes: bool,
    /// Include mode and modification time columns
    pub long: bool,
    /// Never print group labels, breaks or headers
    pub ignore_breaks: bool,
    /// More than one path was requested, so groups get a label line
    pub multiple_groups: bool,
    pub streaming: bool,
    pub cid_base: CidBase,
}

impl TableConfig {
    pub fn min_tab_width(&self) -> usize {
        if self.streaming {
            STREAMING_MIN_TAB_WIDTH
        } else {
            BATCH_MIN_TAB_WIDTH
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            headers: false,
            size_column: true,
            human_sizes: false,
            long: false,
            ignore_breaks: false,
            multiple_groups: false,
            streaming: false,
            cid_base: CidBase::default(),
        }
    }
}

/// Configuration for output formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub use_color: bool,
    pub table: TableConfig,
}
