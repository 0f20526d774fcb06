//! Tabular output of entries.
//!
//! Field values arrive one at a time while an entry is being parsed. The
//! emitter keeps them as a pending row and writes the row when the entry
//! closes, so a run that fails mid-entry leaves no truncated row behind.

use std::io::Write;

use crate::config::{detail_url, escape_for_row, HEADER_COLUMNS};
use crate::error::Result;
use crate::types::{Column, Entry};

/// Receiver of field values produced by the entry state machine.
pub trait RecordSink {
    /// A field of the current entry is known. Called in output column order
    /// as dictated by the document.
    fn field(&mut self, column: Column, value: &str) -> Result<()>;

    /// The current entry closed.
    fn end_record(&mut self, entry: &Entry) -> Result<()>;
}

/// Presentation settings for the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowFormat {
    /// Wrap identifiers in an anchor to the NVD detail page and end rows
    /// with `<br>`.
    pub html_links: bool,
}

impl RowFormat {
    fn terminator(&self) -> &'static str {
        if self.html_links {
            "<br>\n"
        } else {
            "\n"
        }
    }
}

/// Quote an already formatted value as one field.
fn quote(value: &str) -> String {
    format!("\"{}\"", escape_for_row(value))
}

/// Writes the header and one comma-separated row of quoted fields per entry.
pub struct RecordEmitter<W: Write> {
    out: W,
    format: RowFormat,
    pending: Vec<String>,
    header_written: bool,
    rows: usize,
}

impl<W: Write> RecordEmitter<W> {
    pub fn new(out: W, format: RowFormat) -> Self {
        Self {
            out,
            format,
            pending: Vec::new(),
            header_written: false,
            rows: 0,
        }
    }

    /// Write the column header. Only the first call writes anything.
    pub fn write_header(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        let line = HEADER_COLUMNS
            .iter()
            .map(|label| quote(label))
            .collect::<Vec<_>>()
            .join(",");
        write!(self.out, "{line}{}", self.format.terminator())?;
        self.header_written = true;
        Ok(())
    }

    /// Number of rows written so far, header excluded.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Fields collected for an entry that has not closed yet.
    #[cfg(test)]
    fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Drop a partially collected row.
    pub fn discard_pending(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(fields = self.pending.len(), "Discarding partial row");
        }
        self.pending.clear();
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn format_field(&self, column: Column, value: &str) -> String {
        match column {
            Column::Identifier if self.format.html_links => {
                quote(&format!("<a href=\"{}\">{value}</a>", detail_url(value)))
            }
            _ => quote(value),
        }
    }
}

impl<W: Write> RecordSink for RecordEmitter<W> {
    fn field(&mut self, column: Column, value: &str) -> Result<()> {
        let field = self.format_field(column, value);
        self.pending.push(field);
        Ok(())
    }

    fn end_record(&mut self, _entry: &Entry) -> Result<()> {
        self.write_header()?;
        let line = self.pending.join(",");
        self.pending.clear();
        write!(self.out, "{line}{}", self.format.terminator())?;
        self.out.flush()?;
        self.rows += 1;
        Ok(())
    }
}
