//! Listing output formatting
//!
//! This module renders output units either as aligned text or as JSON.
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `table` - Column-aligning writer
//! - `tabular` - Text renderer carrying the last group key between calls
//! - `json` - JSON encoding of output units
//! - `sink` - `UnitSink` implementations writing to a stream
//! - `utils` - Cell formatting helpers (sizes, modes, times)

mod config;
mod json;
mod sink;
mod table;
mod tabular;
mod utils;

pub use config::{OutputConfig, OutputFormat, TAB_PADDING, TableConfig};
pub use json::{JsonLink, JsonObject, JsonOutput, write_json};
pub use sink::{JsonSink, TextSink};
pub use table::{LineStyle, TabWriter};
pub use tabular::{TabularRenderer, render};
pub use utils::{format_mode, format_mtime, format_size};
