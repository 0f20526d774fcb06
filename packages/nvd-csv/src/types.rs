//! Core data types for the converter.
//!
//! These types represent one NVD vulnerability entry and the columns it
//! contributes to the output table.

use std::fmt;

use crate::config::parse_score;

/// Local three-level classification computed from the CVSS base score.
///
/// Independent of the `SEVERITY` label the feed itself carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DerivedSeverity {
    Low,
    Medium,
    High,
}

impl DerivedSeverity {
    /// Classify a raw `CVSS_BASE_SCORE` attribute value.
    ///
    /// Above 4 is high, above 3 is medium, everything else (including a
    /// missing or non-numeric score) is low.
    ///
    /// # Examples
    /// ```
    /// use nvd_csv::types::DerivedSeverity;
    ///
    /// assert_eq!(DerivedSeverity::from_base_score("5.0"), DerivedSeverity::High);
    /// assert_eq!(DerivedSeverity::from_base_score("3.5"), DerivedSeverity::Medium);
    /// assert_eq!(DerivedSeverity::from_base_score(""), DerivedSeverity::Low);
    /// ```
    #[must_use]
    pub fn from_base_score(raw: &str) -> Self {
        let score = parse_score(raw);
        if score > 4.0 {
            Self::High
        } else if score > 3.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Get the string value for table output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for DerivedSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output column a field value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Identifier,
    Published,
    CvssScore,
    Severity,
    DerivedSeverity,
    Description,
    Vendor,
    Product,
    Version,
}

/// A vulnerable vendor/product pair with the versions listed under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorProduct {
    pub vendor: String,
    pub product: String,
    /// Version labels (`num` plus optional ` edition`), in document order.
    pub versions: Vec<String>,
}

/// An external reference attached to an entry.
///
/// Captured but not written to the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    pub source: String,
    pub url: String,
    pub text: String,
}

/// One vulnerability record from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Validated identifier (e.g., "CVE-2004-0002").
    pub id: String,

    /// Validated publication date (YYYY-MM-DD).
    pub published: String,

    /// `CVSS_SCORE` attribute, empty when absent.
    pub cvss_score: String,

    /// `SEVERITY` attribute, empty when absent.
    pub severity: String,

    /// `CVSS_BASE_SCORE` attribute, empty when absent.
    pub cvss_base_score: String,

    pub derived_severity: DerivedSeverity,

    /// CVE-sourced description, if the entry has one.
    pub description: Option<String>,

    pub vendor_products: Vec<VendorProduct>,

    pub references: Vec<Reference>,
}

impl Entry {
    /// Create an entry from its validated header attributes.
    #[must_use]
    pub fn new(
        id: String,
        published: String,
        cvss_score: String,
        severity: String,
        cvss_base_score: String,
    ) -> Self {
        let derived_severity = DerivedSeverity::from_base_score(&cvss_base_score);
        Self {
            id,
            published,
            cvss_score,
            severity,
            cvss_base_score,
            derived_severity,
            description: None,
            vendor_products: Vec::new(),
            references: Vec::new(),
        }
    }
}
