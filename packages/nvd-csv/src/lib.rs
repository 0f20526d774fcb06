//! nvd-csv - Stream NVD CVE XML feeds into CSV rows.
//!
//! This crate reads a National Vulnerability Database feed (CVE entry
//! format) from a file or URL as a stream of XML events and writes one
//! quoted, comma-separated row per vulnerability entry.
//!
//! # Example
//!
//! ```
//! use nvd_csv::{convert, RowFormat};
//!
//! let xml = r#"<nvd><entry name="CVE-2004-0002" published="2004-01-15" CVSS_base_score="5.0">
//!   <desc><descript source="cve">Buffer overflow</descript></desc>
//! </entry></nvd>"#;
//!
//! let mut out = Vec::new();
//! let summary = convert(xml.as_bytes(), &mut out, RowFormat::default()).unwrap();
//!
//! assert_eq!(summary.entries, 1);
//! let table = String::from_utf8(out).unwrap();
//! assert!(table.ends_with("\"CVE-2004-0002\",\"2004-01-15\",\"\",\"\",\"HIGH\",\"Buffer overflow\"\n"));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants and field validators
//! - [`types`]: Entry data types and derived severity
//! - [`error`]: Error types, integrity warnings and Result alias
//! - [`xml`]: Streaming XML event source
//! - [`machine`]: Entry state machine
//! - [`record`]: Row emitter
//! - [`source`] / [`http`]: Feed acquisition from files and URLs
//! - [`converter`]: Ties the pieces together
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod http;
pub mod machine;
pub mod record;
pub mod source;
pub mod types;
pub mod xml;

// Re-export main functions
pub use converter::{convert, convert_source, ConversionSummary, ConvertOptions};

// Re-export commonly used items
pub use config::{escape_for_row, validate_date, validate_identifier};
pub use error::{IntegrityWarning, NvdError, Result};
pub use record::{RecordEmitter, RecordSink, RowFormat};
pub use source::FeedSource;
pub use types::{Column, DerivedSeverity, Entry};
