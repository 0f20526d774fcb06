//! Error types for the converter.
//!
//! Every variant of `NvdError` is fatal: the conversion stops at the first one
//! and rows already written for earlier entries stay written. Non-fatal feed
//! problems are reported as [`IntegrityWarning`] values instead.

use thiserror::Error;

/// Main error type for the converter library.
#[derive(Debug, Error)]
pub enum NvdError {
    /// The XML stream is not well-formed.
    #[error("XML error: {message} at line {line}")]
    MalformedInput { message: String, line: u64 },

    /// Entry name does not contain a CVE/CAN identifier.
    #[error("Invalid CVE number encountered: '{0}'")]
    InvalidIdentifier(String),

    /// Entry publication date does not contain a YYYY-MM-DD date.
    #[error("Invalid date encountered: '{0}'")]
    InvalidDate(String),

    /// An element that belongs to an entry showed up outside of one.
    #[error("Integrity violation: <{element}> outside of an entry, no CVE number")]
    MissingIdentifierContext { element: String },

    /// The feed source could not be opened.
    #[error("Could not open XML input '{locator}': {source}")]
    SourceOpen {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from an already opened source failed.
    #[error("Read from XML input failed: {0}")]
    Read(#[source] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error on the output side.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, NvdError>;

/// A feed integrity problem that is logged but does not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityWarning {
    /// A product element without a vendor.
    #[error("NVD integrity alert: no vendor for product {product}, CVE is {entry}")]
    MissingVendor { product: String, entry: String },

    /// A product element without a product name.
    #[error("NVD integrity alert: no product, CVE is {entry}")]
    MissingProduct { entry: String },
}
