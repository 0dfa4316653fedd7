//! Tabular text renderer
//!
//! Renders output units as aligned rows. The only state carried between
//! calls is the key of the last group seen, so a run that arrives one unit
//! at a time prints each group's label and header exactly once.

use std::io;

use termcolor::{NoColor, WriteColor};

use crate::listing::{EntryKind, EntryRecord, OutputUnit};
use crate::string_utils::escape_non_print;

use super::config::{TAB_PADDING, TableConfig};
use super::table::{LineStyle, TabWriter};
use super::utils::{format_mode, format_mtime, format_size};

/// Renders units as tab-aligned text, remembering the last group key.
#[derive(Debug, Clone)]
pub struct TabularRenderer {
    config: TableConfig,
    last_group_key: String,
}

impl TabularRenderer {
    pub fn new(config: TableConfig) -> Self {
        Self::with_last_group_key(config, "")
    }

    /// Resume rendering after a group that was already printed.
    pub fn with_last_group_key(config: TableConfig, last_group_key: impl Into<String>) -> Self {
        Self {
            config,
            last_group_key: last_group_key.into(),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn last_group_key(&self) -> &str {
        &self.last_group_key
    }

    /// Render one unit. Columns are aligned within the unit only.
    pub fn render_to<W: WriteColor>(&mut self, unit: &OutputUnit, w: &mut W) -> io::Result<()> {
        let mut tw = TabWriter::new(self.config.min_tab_width(), TAB_PADDING);

        for group in &unit.groups {
            if !self.config.ignore_breaks && group.group_key != self.last_group_key {
                if self.config.multiple_groups {
                    if !self.last_group_key.is_empty() {
                        tw.line("", LineStyle::Plain);
                    }
                    tw.line(format!("{}:", group.group_key), LineStyle::Label);
                }
                if self.config.headers {
                    tw.row(self.header_cells(), LineStyle::Header);
                }
                self.last_group_key.clone_from(&group.group_key);
            }

            for entry in &group.entries {
                tw.row(self.entry_cells(entry), entry_style(entry.kind));
            }
        }

        tw.flush(w)
    }

    fn header_cells(&self) -> Vec<String> {
        let mut cells = vec!["Hash".to_string()];
        if self.config.size_column {
            cells.push("Size".to_string());
        }
        if self.config.long {
            cells.push("Mode".to_string());
            cells.push("Modified".to_string());
        }
        cells.push("Name".to_string());
        cells
    }

    fn entry_cells(&self, entry: &EntryRecord) -> Vec<String> {
        let dir_like = entry.kind.is_directory_like();

        let mut cells = vec![entry.cid.encode(self.config.cid_base)];
        if self.config.size_column {
            cells.push(if dir_like {
                "-".to_string()
            } else if self.config.human_sizes {
                format_size(entry.size)
            } else {
                entry.size.to_string()
            });
        }
        if self.config.long {
            cells.push(format_mode(entry.kind, entry.mode));
            cells.push(format_mtime(entry.mtime));
        }

        let mut name = escape_non_print(&entry.name).into_owned();
        if dir_like {
            name.push('/');
        }
        cells.push(name);
        cells
    }
}

fn entry_style(kind: EntryKind) -> LineStyle {
    match kind {
        EntryKind::Directory | EntryKind::HamtShard => LineStyle::Directory,
        EntryKind::Symlink => LineStyle::Symlink,
        EntryKind::File | EntryKind::Unknown => LineStyle::Plain,
    }
}

/// Render `unit` to plain text, starting from `prior_last_group_key`.
///
/// Returns the text and the last group key seen, to be passed to the next
/// call when units arrive one at a time.
pub fn render(unit: &OutputUnit, prior_last_group_key: &str, config: &TableConfig) -> (String, String) {
    let mut renderer = TabularRenderer::with_last_group_key(config.clone(), prior_last_group_key);
    let mut out = NoColor::new(Vec::new());
    // Writes into a Vec cannot fail.
    let _ = renderer.render_to(unit, &mut out);
    let text = String::from_utf8_lossy(&out.into_inner()).into_owned();
    (text, renderer.last_group_key)
}
