//! Main conversion service that ties all components together.

use std::io::{Read, Write};

use crate::error::{IntegrityWarning, Result};
use crate::machine::EntryMachine;
use crate::record::{RecordEmitter, RowFormat};
use crate::source::FeedSource;
use crate::xml::EventDispatcher;

/// Options for one conversion run.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub format: RowFormat,
    /// HTTP timeout in seconds, used for URL sources.
    pub timeout_secs: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: RowFormat::default(),
            timeout_secs: crate::config::HTTP_TIMEOUT_SECS,
        }
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Entries found in the feed.
    pub entries: usize,

    /// Rows written, header excluded.
    pub rows: usize,

    /// Non-fatal integrity problems, in document order.
    pub warnings: Vec<IntegrityWarning>,
}

/// Convert an NVD XML stream to rows.
///
/// Writes the header, then one row per entry as each entry closes. On error,
/// rows of entries that already closed stay in `output`; the entry being
/// parsed when the error hit is dropped.
///
/// # Arguments
/// * `input` - NVD XML byte stream
/// * `output` - Destination of the table
/// * `format` - Presentation settings
///
/// # Returns
/// Counts and warnings of the run
pub fn convert<R: Read, W: Write>(
    input: R,
    output: W,
    format: RowFormat,
) -> Result<ConversionSummary> {
    let mut emitter = RecordEmitter::new(output, format);
    emitter.write_header()?;

    let mut machine = EntryMachine::new(emitter);
    if let Err(e) = EventDispatcher::new(input).run(&mut machine) {
        machine.sink_mut().discard_pending();
        tracing::debug!(
            entries = machine.entries_seen(),
            rows = machine.sink_mut().rows(),
            "Conversion aborted"
        );
        return Err(e);
    }

    let entries = machine.entries_seen();
    let (emitter, warnings) = machine.into_parts();
    let rows = emitter.rows();
    emitter.into_inner()?;

    tracing::info!(entries, rows, warnings = warnings.len(), "Conversion finished");

    Ok(ConversionSummary {
        entries,
        rows,
        warnings,
    })
}

/// Open a feed source and convert it.
pub fn convert_source<W: Write>(
    source: &FeedSource,
    output: W,
    options: &ConvertOptions,
) -> Result<ConversionSummary> {
    tracing::debug!(source = %source, "Opening feed");
    let input = source.open_with_timeout(options.timeout_secs)?;
    convert(input, output, options.format)
}
