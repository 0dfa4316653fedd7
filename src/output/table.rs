//! Column-aligning writer for tab-separated rows.
//!
//! Rows are buffered until [`TabWriter::flush`]. Every cell but the last in a
//! row belongs to a column; a column block is a run of consecutive rows that
//! all have a cell in that column, and each block is padded to its widest
//! cell plus `padding` (never narrower than `min_width`). Rows without that
//! column, such as blank lines and group labels, end the block. These are
//! the cell and block rules of Go's `text/tabwriter` with a space pad
//! character and no flags.

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

/// How a buffered line is coloured when written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    /// Group label line
    Label,
    /// Column header row
    Header,
    /// Entry row whose last cell names a directory
    Directory,
    /// Entry row whose last cell names a symlink
    Symlink,
}

impl LineStyle {
    fn spec(&self) -> Option<ColorSpec> {
        let mut spec = ColorSpec::new();
        match self {
            LineStyle::Plain => return None,
            LineStyle::Label => spec.set_fg(Some(Color::Blue)).set_bold(true),
            LineStyle::Header => spec.set_bold(true),
            LineStyle::Directory => spec.set_fg(Some(Color::Blue)).set_bold(true),
            LineStyle::Symlink => spec.set_fg(Some(Color::Cyan)),
        };
        Some(spec)
    }

    /// Whether the style covers the whole line or only the trailing cell.
    fn whole_line(&self) -> bool {
        matches!(self, LineStyle::Label | LineStyle::Header)
    }
}

#[derive(Debug)]
struct Line {
    cells: Vec<String>,
    style: LineStyle,
}

/// Buffered column-aligning writer.
#[derive(Debug)]
pub struct TabWriter {
    min_width: usize,
    padding: usize,
    lines: Vec<Line>,
    widths: Vec<usize>,
}

impl TabWriter {
    pub fn new(min_width: usize, padding: usize) -> Self {
        Self {
            min_width,
            padding,
            lines: Vec::new(),
            widths: Vec::new(),
        }
    }

    /// Buffer a row of cells.
    pub fn row(&mut self, cells: Vec<String>, style: LineStyle) {
        let cells = if cells.is_empty() {
            vec![String::new()]
        } else {
            cells
        };
        self.lines.push(Line { cells, style });
    }

    /// Buffer a line with no columns.
    pub fn line(&mut self, text: impl Into<String>, style: LineStyle) {
        self.row(vec![text.into()], style);
    }

    /// Write every buffered line, aligned, and clear the buffer.
    pub fn flush<W: WriteColor>(&mut self, w: &mut W) -> io::Result<()> {
        let end = self.lines.len();
        let result = self.format(w, 0, end);
        self.lines.clear();
        self.widths.clear();
        result
    }

    fn format<W: WriteColor>(&mut self, w: &mut W, line0: usize, line1: usize) -> io::Result<()> {
        let column = self.widths.len();
        let mut start = line0;
        let mut this = line0;

        while this < line1 {
            if !self.has_column(this, column) {
                this += 1;
                continue;
            }

            // Lines before the block are complete at this depth.
            self.write_lines(w, start, this)?;
            start = this;

            let mut width = self.min_width;
            while this < line1 && self.has_column(this, column) {
                width = width.max(display_width(&self.lines[this].cells[column]) + self.padding);
                this += 1;
            }

            self.widths.push(width);
            self.format(w, start, this)?;
            self.widths.pop();
            start = this;
        }

        self.write_lines(w, start, line1)
    }

    fn has_column(&self, line: usize, column: usize) -> bool {
        column + 1 < self.lines[line].cells.len()
    }

    fn write_lines<W: WriteColor>(&self, w: &mut W, line0: usize, line1: usize) -> io::Result<()> {
        for line in &self.lines[line0..line1] {
            let spec = line.style.spec();
            let last = line.cells.len() - 1;

            if line.style.whole_line() {
                if let Some(spec) = &spec {
                    w.set_color(spec)?;
                }
            }
            for (j, cell) in line.cells.iter().enumerate() {
                let styled_cell = j == last && !line.style.whole_line() && spec.is_some();
                if styled_cell {
                    if let Some(spec) = &spec {
                        w.set_color(spec)?;
                    }
                }
                w.write_all(cell.as_bytes())?;
                if styled_cell {
                    w.reset()?;
                }
                if let Some(&width) = self.widths.get(j) {
                    let pad = width.saturating_sub(display_width(cell));
                    write!(w, "{:pad$}", "", pad = pad)?;
                }
            }
            if spec.is_some() && line.style.whole_line() {
                w.reset()?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use termcolor::{Ansi, NoColor};

    use super::*;

    fn cells(s: &[&str]) -> Vec<String> {
        s.iter().map(|c| c.to_string()).collect()
    }

    fn flush(tw: &mut TabWriter) -> String {
        let mut out = NoColor::new(Vec::new());
        tw.flush(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_aligns_columns() {
        let mut tw = TabWriter::new(1, 1);
        tw.row(cells(&["Hash", "Size", "Name"]), LineStyle::Header);
        tw.row(cells(&["abcdef", "1", "z"]), LineStyle::Plain);
        tw.row(cells(&["ab", "12345", "m/"]), LineStyle::Directory);
        assert_eq!(
            flush(&mut tw),
            "Hash   Size  Name\nabcdef 1     z\nab     12345 m/\n"
        );
    }

    #[test]
    fn test_last_cell_not_padded() {
        let mut tw = TabWriter::new(1, 1);
        tw.row(cells(&["a", "short"]), LineStyle::Plain);
        tw.row(cells(&["b", "much longer name"]), LineStyle::Plain);
        assert_eq!(flush(&mut tw), "a short\nb much longer name\n");
    }

    #[test]
    fn test_min_width_applies() {
        let mut tw = TabWriter::new(10, 1);
        tw.row(cells(&["ab", "c"]), LineStyle::Plain);
        assert_eq!(flush(&mut tw), "ab        c\n");
    }

    #[test]
    fn test_lines_without_columns_break_blocks() {
        let mut tw = TabWriter::new(1, 1);
        tw.line("/a:", LineStyle::Label);
        tw.row(cells(&["x", "one"]), LineStyle::Plain);
        tw.line("", LineStyle::Plain);
        tw.line("/b:", LineStyle::Label);
        tw.row(cells(&["xxxxx", "two"]), LineStyle::Plain);
        assert_eq!(flush(&mut tw), "/a:\nx one\n\n/b:\nxxxxx two\n");
    }

    #[test]
    fn test_nested_column_blocks() {
        let mut tw = TabWriter::new(1, 1);
        tw.row(cells(&["aaa", "b"]), LineStyle::Plain);
        tw.row(cells(&["a", "bbb", "c"]), LineStyle::Plain);
        tw.row(cells(&["a", "b", "c"]), LineStyle::Plain);
        assert_eq!(flush(&mut tw), "aaa b\na   bbb c\na   b   c\n");
    }

    #[test]
    fn test_empty_cells_still_occupy_column() {
        let mut tw = TabWriter::new(1, 1);
        tw.row(cells(&["", "x"]), LineStyle::Plain);
        tw.row(cells(&["ab", "y"]), LineStyle::Plain);
        tw.row(cells(&["", "", "z"]), LineStyle::Plain);
        assert_eq!(flush(&mut tw), "   x\nab y\n    z\n");
    }

    #[test]
    fn test_width_counts_chars_not_bytes() {
        let mut tw = TabWriter::new(1, 1);
        tw.row(cells(&["é", "x"]), LineStyle::Plain);
        tw.row(cells(&["ab", "y"]), LineStyle::Plain);
        assert_eq!(flush(&mut tw), "é  x\nab y\n");
    }

    #[test]
    fn test_flush_clears_buffer() {
        let mut tw = TabWriter::new(1, 1);
        tw.row(cells(&["a", "b"]), LineStyle::Plain);
        flush(&mut tw);
        assert_eq!(flush(&mut tw), "");
    }

    #[test]
    fn test_colour_only_on_styled_cells() {
        let mut tw = TabWriter::new(1, 1);
        tw.row(cells(&["h", "dir/"]), LineStyle::Directory);
        let mut out = Ansi::new(Vec::new());
        tw.flush(&mut out).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.starts_with("h "));
        assert!(text.contains("\x1b["));
        assert!(text.ends_with("\x1b[0m\n"));
    }
}
