//! Configuration constants and field validation functions.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{NvdError, Result};

/// Feed converted when no source is given on the command line.
pub const DEFAULT_FEED_URL: &str = "https://nvd.nist.gov/download/nvdcve-recent.xml";

/// Base URL of the NVD vulnerability detail page, used for link formatting.
pub const NVD_DETAIL_URL: &str = "https://web.nvd.nist.gov/view/vuln/detail";

/// Size of each read from the feed source in bytes.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Default HTTP timeout in seconds.
///
/// Covers the whole streamed response body, so it is generous: the yearly
/// feeds are tens of megabytes.
pub const HTTP_TIMEOUT_SECS: u64 = 300;

/// Column labels of the output table, in emission order.
pub const HEADER_COLUMNS: [&str; 7] = [
    "CVE",
    "Published Date",
    "CVSS Score",
    "CVE Severity",
    "Custom Severity",
    "Description",
    "Vendor - Product - Version",
];

/// Description source whose text ends up in the row.
pub const CVE_DESCRIPTION_SOURCE: &str = "cve";

/// Identifier pattern. The NVD documentation suggests `(CAN|CVE)-/d/d/d/d-/d/d/d/d`,
/// which does not match anything; this is the working form.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(CAN|CVE)-\d{4}-\d{4}").expect("valid regex"));

/// Date pattern: YYYY-MM-DD, anywhere in the input.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid regex"));

/// Leading decimal number, as a loosely typed score attribute would be read.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").expect("valid regex")
});

/// Extract the CVE/CAN identifier from an entry name.
///
/// The first match anywhere in the input is returned, so surrounding text is
/// dropped.
///
/// # Examples
/// ```
/// use nvd_csv::config::validate_identifier;
///
/// assert_eq!(validate_identifier("CAN-2004-0002").unwrap(), "CAN-2004-0002");
/// assert_eq!(validate_identifier("see CVE-2005-1234.").unwrap(), "CVE-2005-1234");
/// assert!(validate_identifier("CVE-05-1234").is_err());
/// ```
pub fn validate_identifier(input: &str) -> Result<String> {
    IDENTIFIER_PATTERN
        .find(input)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| NvdError::InvalidIdentifier(input.to_string()))
}

/// Extract a YYYY-MM-DD date from an entry attribute.
///
/// Only the shape is checked, not whether the date exists in the calendar.
///
/// # Examples
/// ```
/// use nvd_csv::config::validate_date;
///
/// assert_eq!(validate_date("2004-03-03").unwrap(), "2004-03-03");
/// assert!(validate_date("03/03/2004").is_err());
/// ```
pub fn validate_date(input: &str) -> Result<String> {
    DATE_PATTERN
        .find(input)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| NvdError::InvalidDate(input.to_string()))
}

/// Escape a value for embedding in a double-quoted field.
///
/// Doubles every `"`. Escaping twice doubles again, so apply it exactly once,
/// when the field is written.
///
/// # Examples
/// ```
/// use nvd_csv::config::escape_for_row;
///
/// assert_eq!(escape_for_row(r#"He said "hi""#), r#"He said ""hi"""#);
/// assert_eq!(escape_for_row("plain"), "plain");
/// ```
pub fn escape_for_row(input: &str) -> String {
    input.replace('"', "\"\"")
}

/// Numeric value of a score attribute.
///
/// Reads the longest leading decimal number after trimming whitespace;
/// anything without one is 0.
pub fn parse_score(input: &str) -> f64 {
    LEADING_NUMBER
        .find(input.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Build the NVD detail page URL for an identifier.
///
/// # Examples
/// ```
/// use nvd_csv::config::detail_url;
///
/// assert_eq!(
///     detail_url("CVE-2004-0002"),
///     "https://web.nvd.nist.gov/view/vuln/detail?vulnId=CVE-2004-0002"
/// );
/// ```
pub fn detail_url(id: &str) -> String {
    format!("{NVD_DETAIL_URL}?vulnId={id}")
}
