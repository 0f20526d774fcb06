//! Entry state machine: turns the XML event stream into record fields.
//!
//! NVD feeds never reuse an element name at different nesting levels, so the
//! context is flat: a handful of "current" values plus one text accumulator,
//! with no element path. All of it lives in a [`ParseContext`] owned by one
//! [`EntryMachine`], which lives for exactly one document.

use crate::config::{validate_date, validate_identifier, CVE_DESCRIPTION_SOURCE};
use crate::error::{IntegrityWarning, NvdError, Result};
use crate::record::RecordSink;
use crate::types::{Column, Entry, Reference, VendorProduct};
use crate::xml::{Attributes, EventHandler};

/// Flat per-document state.
#[derive(Debug, Default)]
pub struct ParseContext {
    /// Entry currently open, if any. Its `id` is the current CVE number.
    entry: Option<Entry>,
    /// `SOURCE` of the description being read.
    description_source: Option<String>,
    /// Whether the open entry already emitted its description.
    description_emitted: bool,
    vendor: String,
    product: String,
    /// Version labels of the current product, concatenated.
    version: String,
    /// "vendor - product" pairs of the current vulnerable software list.
    pairings: Vec<String>,
    /// `SOURCE` and `URL` of the reference being read.
    reference: Option<(String, String)>,
    /// Character data of the current text-carrying element.
    text: String,
    /// Whether a `DESCRIPT` or `REF` element is open.
    collecting: bool,
    entries_seen: usize,
    warnings: Vec<IntegrityWarning>,
}

impl ParseContext {
    /// Identifier of the open entry.
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        self.entry.as_ref().map(|entry| entry.id.as_str())
    }

    fn require_id(&self, element: &str) -> Result<String> {
        self.current_id()
            .map(str::to_string)
            .ok_or_else(|| NvdError::MissingIdentifierContext {
                element: element.to_string(),
            })
    }

    fn start_text(&mut self) {
        self.text.clear();
        self.collecting = true;
    }

    fn take_text(&mut self) -> String {
        self.collecting = false;
        std::mem::take(&mut self.text)
    }
}

/// Streaming converter from NVD events to record fields.
///
/// Fields go to the sink as soon as they are known; the sink sees
/// `end_record` when the entry closes.
pub struct EntryMachine<S: RecordSink> {
    ctx: ParseContext,
    sink: S,
}

impl<S: RecordSink> EntryMachine<S> {
    pub fn new(sink: S) -> Self {
        Self {
            ctx: ParseContext::default(),
            sink,
        }
    }

    /// Number of entries opened so far.
    #[must_use]
    pub fn entries_seen(&self) -> usize {
        self.ctx.entries_seen
    }

    /// Integrity warnings raised so far.
    #[must_use]
    pub fn warnings(&self) -> &[IntegrityWarning] {
        &self.ctx.warnings
    }

    #[must_use]
    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the machine, returning the sink and the collected warnings.
    pub fn into_parts(self) -> (S, Vec<IntegrityWarning>) {
        (self.sink, self.ctx.warnings)
    }

    fn emit(&mut self, column: Column, value: &str) -> Result<()> {
        self.sink.field(column, value)
    }

    fn warn(&mut self, warning: IntegrityWarning) {
        tracing::warn!("{warning}");
        self.ctx.warnings.push(warning);
    }

    fn open_entry(&mut self, attrs: &Attributes) -> Result<()> {
        self.ctx.entries_seen += 1;

        let id = validate_identifier(attrs.get_or_empty("NAME"))?;
        let published = validate_date(attrs.get_or_empty("PUBLISHED"))?;
        let entry = Entry::new(
            id,
            published,
            attrs.get_or_empty("CVSS_SCORE").to_string(),
            attrs.get_or_empty("SEVERITY").to_string(),
            attrs.get_or_empty("CVSS_BASE_SCORE").to_string(),
        );
        tracing::debug!(
            id = %entry.id,
            published = %entry.published,
            "Found CVE entry"
        );

        self.emit(Column::Identifier, &entry.id)?;
        self.emit(Column::Published, &entry.published)?;
        self.emit(Column::CvssScore, &entry.cvss_score)?;
        self.emit(Column::Severity, &entry.severity)?;
        self.emit(Column::DerivedSeverity, entry.derived_severity.as_str())?;

        self.ctx.entry = Some(entry);
        self.ctx.description_emitted = false;
        Ok(())
    }

    fn close_entry(&mut self) -> Result<()> {
        self.ctx.description_source = None;
        self.ctx.reference = None;
        if let Some(entry) = self.ctx.entry.take() {
            self.sink.end_record(&entry)?;
        }
        Ok(())
    }

    fn open_product(&mut self, attrs: &Attributes) -> Result<()> {
        let id = self.ctx.require_id("PROD")?;
        let vendor = attrs.get_or_empty("VENDOR").to_string();
        let product = attrs.get_or_empty("NAME").to_string();
        tracing::debug!(vendor = %vendor, product = %product, "Found product");

        if vendor.is_empty() {
            self.warn(IntegrityWarning::MissingVendor {
                product: product.clone(),
                entry: id.clone(),
            });
        }
        if product.is_empty() {
            self.warn(IntegrityWarning::MissingProduct { entry: id });
        }

        self.emit(Column::Vendor, &vendor)?;
        self.emit(Column::Product, &product)?;

        self.ctx.version.clear();
        self.ctx.pairings.clear();
        self.ctx.pairings.push(format!("{vendor} - {product}"));
        if let Some(entry) = self.ctx.entry.as_mut() {
            entry.vendor_products.push(VendorProduct {
                vendor: vendor.clone(),
                product: product.clone(),
                versions: Vec::new(),
            });
        }
        self.ctx.vendor = vendor;
        self.ctx.product = product;
        Ok(())
    }

    fn open_version(&mut self, attrs: &Attributes) -> Result<()> {
        self.ctx.require_id("VERS")?;

        let mut label = attrs.get_or_empty("NUM").to_string();
        if let Some(edition) = attrs.get("EDITION") {
            label.push(' ');
            label.push_str(edition);
        }
        tracing::debug!(
            version = %label,
            vendor = %self.ctx.vendor,
            product = %self.ctx.product,
            "Vulnerable version"
        );

        self.ctx.version.push_str(&label);
        if let Some(current) = self
            .ctx
            .entry
            .as_mut()
            .and_then(|entry| entry.vendor_products.last_mut())
        {
            current.versions.push(label);
        }

        let version = self.ctx.version.clone();
        self.emit(Column::Version, &version)
    }

    fn close_description(&mut self) -> Result<()> {
        let id = self.ctx.require_id("DESCRIPT")?;
        let text = self.ctx.take_text();
        let source = self.ctx.description_source.take();

        if source.as_deref() != Some(CVE_DESCRIPTION_SOURCE) {
            tracing::debug!(id = %id, source = ?source, "Found non CVE description, skipping");
            return Ok(());
        }
        if self.ctx.description_emitted {
            tracing::debug!(id = %id, "Second CVE description, skipping");
            return Ok(());
        }

        tracing::debug!(id = %id, description = %text, "Found description");
        self.emit(Column::Description, &text)?;
        self.ctx.description_emitted = true;
        if let Some(entry) = self.ctx.entry.as_mut() {
            entry.description = Some(text);
        }
        Ok(())
    }

    fn close_reference(&mut self) {
        let text = self.ctx.take_text();
        let (source, url) = self.ctx.reference.take().unwrap_or_default();
        tracing::debug!(source = %source, url = %url, content = %text, "Found reference");
        if let Some(entry) = self.ctx.entry.as_mut() {
            entry.references.push(Reference { source, url, text });
        }
    }

    fn close_vulnerable_software(&mut self) {
        tracing::debug!(products = %self.ctx.pairings.join(";"), "Vulnerable software");
        self.ctx.pairings.clear();
    }
}

/// Human readable meaning of a classification element, for the debug trace.
fn classification(name: &str) -> Option<&'static str> {
    let meaning = match name {
        "AVAIL" => "loss type is availability",
        "CONF" => "loss type is confidentiality",
        "INT" => "loss type is integrity",
        "SEC_PROT" => "loss type is security protection",
        "ACCESS" => "vulnerability type is access",
        "INPUT" => "vulnerability type is input",
        "DESIGN" => "vulnerability type is design",
        "EXCEPTION" => "vulnerability type is exception",
        "ENV" => "vulnerability type is environment",
        "CONFIG" => "vulnerability type is configuration",
        "RACE" => "vulnerability type is race",
        "OTHER" => "vulnerability type is other",
        "REMOTE" => "vulnerability range is remote",
        "LOCAL" => "vulnerability range is local",
        "USER_INIT" => "vulnerability range is through a user",
        _ => return None,
    };
    Some(meaning)
}

impl<S: RecordSink> EventHandler for EntryMachine<S> {
    fn start_element(&mut self, name: &str, attrs: &Attributes) -> Result<()> {
        tracing::trace!(tag = name, "Processing start tag");
        match name {
            "ENTRY" => self.open_entry(attrs)?,
            "DESCRIPT" => {
                self.ctx.description_source = attrs.get("SOURCE").map(str::to_string);
                self.ctx.start_text();
            }
            "PROD" => self.open_product(attrs)?,
            "VERS" => self.open_version(attrs)?,
            "REF" => {
                self.ctx.reference = Some((
                    attrs.get_or_empty("SOURCE").to_string(),
                    attrs.get_or_empty("URL").to_string(),
                ));
                self.ctx.start_text();
            }
            _ => {}
        }
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        match name {
            "ENTRY" => self.close_entry()?,
            "DESCRIPT" => self.close_description()?,
            "REF" => self.close_reference(),
            "VULN_SOFT" => self.close_vulnerable_software(),
            other => {
                if let Some(meaning) = classification(other) {
                    tracing::debug!(id = ?self.ctx.current_id(), "{meaning}");
                }
            }
        }
        Ok(())
    }

    fn character_data(&mut self, data: &str) -> Result<()> {
        if self.ctx.collecting {
            self.ctx.text.push_str(data);
        }
        Ok(())
    }
}
