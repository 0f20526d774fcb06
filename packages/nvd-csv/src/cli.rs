//! Command-line interface for the converter.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{DEFAULT_FEED_URL, HTTP_TIMEOUT_SECS};
use crate::converter::{convert_source, ConversionSummary, ConvertOptions};
use crate::error::{NvdError, Result};
use crate::record::RowFormat;
use crate::source::FeedSource;

/// nvd-csv - Convert an NVD CVE XML feed into CSV rows.
#[derive(Parser)]
#[command(name = "nvd-csv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Feed to convert: a local file or an http(s) URL (default: NVD recent feed)
    pub source: Option<String>,

    /// Link identifiers to the NVD detail page and end rows with <br>
    #[arg(long)]
    pub html: bool,

    /// Write the table to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Trace every element the converter handles
    #[arg(short, long)]
    pub debug: bool,

    /// HTTP timeout in seconds for URL sources
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl Cli {
    /// Feed locator, falling back to the default feed.
    #[must_use]
    pub fn locator(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_FEED_URL)
    }

    #[must_use]
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            format: RowFormat {
                html_links: self.html,
            },
            timeout_secs: self.timeout,
        }
    }
}

/// Run the CLI.
pub fn run(cli: Cli) -> Result<()> {
    let source = FeedSource::parse(cli.locator());
    let options = cli.options();

    let summary = match cli.output.as_deref() {
        Some(path) => convert_to_file(&source, path, &options)?,
        None => convert_source(&source, io::stdout().lock(), &options)?,
    };

    print_summary(&summary);
    Ok(())
}

/// Convert into a file, with a spinner on the terminal.
fn convert_to_file(
    source: &FeedSource,
    path: &Path,
    options: &ConvertOptions,
) -> Result<ConversionSummary> {
    // Validate output directory exists before opening the feed
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(NvdError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Output directory does not exist: {}", parent.display()),
            )));
        }
    }

    let file = BufWriter::new(File::create(path)?);

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("Converting {source}..."));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = convert_source(source, file, options);
    pb.finish_and_clear();

    let summary = result?;
    eprintln!(
        "{} {}",
        style("Saved to:").green().bold(),
        path.display()
    );
    Ok(summary)
}

fn print_summary(summary: &ConversionSummary) {
    // stdout may carry the table, so the summary goes to stderr
    eprintln!(
        "Found {} entries in this NVD location",
        style(summary.entries).cyan()
    );
    if !summary.warnings.is_empty() {
        eprintln!(
            "  Warnings: {}",
            style(summary.warnings.len()).yellow().bold()
        );
    }
}
