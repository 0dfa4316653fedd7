//! Sinks that write output units as they are emitted

use std::io::Write;

use termcolor::WriteColor;

use crate::cid::CidBase;
use crate::error::ListError;
use crate::listing::{OutputUnit, UnitSink};

use super::config::TableConfig;
use super::json::write_json;
use super::tabular::TabularRenderer;

/// Renders each unit as aligned text and flushes it immediately.
pub struct TextSink<W: WriteColor> {
    renderer: TabularRenderer,
    out: W,
}

impl<W: WriteColor> TextSink<W> {
    pub fn new(out: W, config: TableConfig) -> Self {
        Self {
            renderer: TabularRenderer::new(config),
            out,
        }
    }

    pub fn last_group_key(&self) -> &str {
        self.renderer.last_group_key()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: WriteColor> UnitSink for TextSink<W> {
    fn emit(&mut self, unit: OutputUnit) -> Result<(), ListError> {
        self.renderer.render_to(&unit, &mut self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes each unit as JSON: pretty for a single batch unit, one line per
/// unit when streaming.
pub struct JsonSink<W: Write> {
    out: W,
    base: CidBase,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W, base: CidBase, streaming: bool) -> Self {
        Self {
            out,
            base,
            pretty: !streaming,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> UnitSink for JsonSink<W> {
    fn emit(&mut self, unit: OutputUnit) -> Result<(), ListError> {
        write_json(&mut self.out, &unit, self.base, self.pretty)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use termcolor::NoColor;

    use super::*;
    use crate::cid::ContentId;
    use crate::listing::{EntryKind, EntryRecord};

    fn single(key: &str, name: &str) -> OutputUnit {
        OutputUnit::single(
            key,
            EntryRecord::new(name, ContentId::digest(name.as_bytes()), 1, EntryKind::File),
        )
    }

    #[test]
    fn test_text_sink_threads_group_key() {
        let config = TableConfig {
            multiple_groups: true,
            ..Default::default()
        };
        let mut sink = TextSink::new(NoColor::new(Vec::new()), config);
        sink.emit(single("/a", "x")).unwrap();
        sink.emit(single("/a", "y")).unwrap();
        sink.emit(single("/b", "z")).unwrap();
        assert_eq!(sink.last_group_key(), "/b");

        let text = String::from_utf8(sink.into_inner().into_inner()).unwrap();
        let labels: Vec<_> = text.lines().filter(|l| l.ends_with(':')).collect();
        assert_eq!(labels, vec!["/a:", "/b:"]);
    }

    #[test]
    fn test_json_sink_streaming_is_ndjson() {
        let mut sink = JsonSink::new(Vec::new(), CidBase::Base32, true);
        sink.emit(single("/a", "x")).unwrap();
        sink.emit(single("/a", "y")).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["objects"][0]["hash"], "/a");
        }
    }
}
