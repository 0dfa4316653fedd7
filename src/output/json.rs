//! JSON output formatting

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cid::CidBase;
use crate::error::ListError;
use crate::listing::{EntryRecord, GroupResult, OutputUnit};

use super::utils::format_mode_octal;

/// Structured form of one output unit.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub objects: Vec<JsonObject>,
}

/// One group: the requested path and its entries.
#[derive(Debug, Serialize)]
pub struct JsonObject {
    pub hash: String,
    pub links: Vec<JsonLink>,
}

#[derive(Debug, Serialize)]
pub struct JsonLink {
    pub name: String,
    pub hash: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime: Option<DateTime<Utc>>,
}

impl JsonOutput {
    pub fn from_unit(unit: &OutputUnit, base: CidBase) -> Self {
        Self {
            objects: unit
                .groups
                .iter()
                .map(|g| JsonObject::from_group(g, base))
                .collect(),
        }
    }
}

impl JsonObject {
    fn from_group(group: &GroupResult, base: CidBase) -> Self {
        Self {
            hash: group.group_key.clone(),
            links: group
                .entries
                .iter()
                .map(|e| JsonLink::from_entry(e, base))
                .collect(),
        }
    }
}

impl JsonLink {
    fn from_entry(entry: &EntryRecord, base: CidBase) -> Self {
        Self {
            name: entry.name.clone(),
            hash: entry.cid.encode(base),
            size: entry.size,
            kind: entry.kind.as_str(),
            target: entry.symlink_target.clone(),
            mode: entry.mode.map(format_mode_octal),
            mtime: entry.mtime,
        }
    }
}

/// Write `unit` as JSON followed by a newline.
///
/// `pretty` selects indented output; otherwise the unit is written on a
/// single line, so a sequence of units forms newline-delimited JSON.
pub fn write_json<W: Write>(
    w: &mut W,
    unit: &OutputUnit,
    base: CidBase,
    pretty: bool,
) -> Result<(), ListError> {
    let output = JsonOutput::from_unit(unit, base);
    if pretty {
        serde_json::to_writer_pretty(&mut *w, &output)?;
    } else {
        serde_json::to_writer(&mut *w, &output)?;
    }
    writeln!(w)?;
    Ok(())
}
