//! End-to-end integration tests for the conversion pipeline.
//!
//! Runs the library on fixture feeds in the NVD CVE 1.2 format.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use nvd_csv::machine::EntryMachine;
use nvd_csv::record::{RecordSink, RowFormat};
use nvd_csv::types::{Column, DerivedSeverity, Entry};
use nvd_csv::xml::EventDispatcher;
use nvd_csv::{convert, convert_source, ConvertOptions, FeedSource, IntegrityWarning, NvdError};

const HEADER: &str = "\"CVE\",\"Published Date\",\"CVSS Score\",\"CVE Severity\",\"Custom Severity\",\"Description\",\"Vendor - Product - Version\"";

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Sink that keeps finished entries only.
#[derive(Default)]
struct Entries(Vec<Entry>);

impl RecordSink for Entries {
    fn field(&mut self, _column: Column, _value: &str) -> nvd_csv::Result<()> {
        Ok(())
    }

    fn end_record(&mut self, entry: &Entry) -> nvd_csv::Result<()> {
        self.0.push(entry.clone());
        Ok(())
    }
}

fn parse_entries(xml: &str) -> Vec<Entry> {
    let mut machine = EntryMachine::new(Entries::default());
    EventDispatcher::new(xml.as_bytes())
        .run(&mut machine)
        .expect("fixture should parse");
    let (entries, _) = machine.into_parts();
    entries.0
}

#[test]
fn test_sample_feed_rows() {
    let xml = load_fixture("nvdcve-sample.xml");
    let mut out = Vec::new();
    let summary = convert(xml.as_bytes(), &mut out, RowFormat::default()).unwrap();

    let expected = [
        HEADER,
        r#""CVE-2004-0002","2004-01-15","","","HIGH","Buffer overflow","Acme","Widget","1.0""#,
        r#""CAN-2003-0100","2003-03-18","3.5","Medium","MEDIUM","Crafted ""GET"" requests & headers crash the server","Example Corp","Server","2.0 sp1","","Gadget","4""#,
        r#""CVE-2005-1234","2005-06-30","","","LOW""#,
    ];
    let table = String::from_utf8(out).unwrap();
    assert_eq!(table.lines().collect::<Vec<_>>(), expected);

    assert_eq!(summary.entries, 3);
    assert_eq!(summary.rows, 3);
}

#[test]
fn test_sample_feed_warnings() {
    let xml = load_fixture("nvdcve-sample.xml");
    let summary = convert(xml.as_bytes(), std::io::sink(), RowFormat::default()).unwrap();

    assert_eq!(
        summary.warnings,
        vec![IntegrityWarning::MissingVendor {
            product: "Gadget".to_string(),
            entry: "CAN-2003-0100".to_string(),
        }]
    );
}

#[test]
fn test_sample_feed_entries() {
    let entries = parse_entries(&load_fixture("nvdcve-sample.xml"));
    assert_eq!(entries.len(), 3);

    let first = &entries[0];
    assert_eq!(first.id, "CVE-2004-0002");
    assert_eq!(first.cvss_base_score, "5.0");
    assert_eq!(first.derived_severity, DerivedSeverity::High);
    assert_eq!(first.references.len(), 1);
    assert_eq!(first.references[0].source, "BUGTRAQ");
    assert_eq!(first.references[0].text, "20040115 Widget overflow");

    let second = &entries[1];
    assert_eq!(second.severity, "Medium");
    assert_eq!(
        second.description.as_deref(),
        Some("Crafted \"GET\" requests & headers crash the server")
    );
    let vendors: Vec<_> = second
        .vendor_products
        .iter()
        .map(|vp| (vp.vendor.as_str(), vp.product.as_str()))
        .collect();
    assert_eq!(vendors, vec![("Example Corp", "Server"), ("", "Gadget")]);

    let third = &entries[2];
    assert_eq!(third.published, "2005-06-30");
    assert_eq!(third.description, None);
    assert!(third.vendor_products.is_empty());
    assert_eq!(third.references[0].url, "http://example.org/advisory");
}

#[test]
fn test_html_links() {
    let xml = load_fixture("nvdcve-sample.xml");
    let mut out = Vec::new();
    convert(xml.as_bytes(), &mut out, RowFormat { html_links: true }).unwrap();
    let table = String::from_utf8(out).unwrap();

    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().all(|line| line.ends_with("<br>")));
    assert!(lines[1].starts_with(
        r#""<a href=""https://web.nvd.nist.gov/view/vuln/detail?vulnId=CVE-2004-0002"">CVE-2004-0002</a>","2004-01-15""#
    ));
}

#[test]
fn test_invalid_identifier_keeps_earlier_rows() {
    let xml = load_fixture("nvdcve-invalid-name.xml");
    let mut out = Vec::new();
    let err = convert(xml.as_bytes(), &mut out, RowFormat::default()).unwrap_err();

    assert!(matches!(err, NvdError::InvalidIdentifier(ref raw) if raw == "BID-9999"));
    let table = String::from_utf8(out).unwrap();
    assert_eq!(
        table.lines().collect::<Vec<_>>(),
        vec![
            HEADER,
            r#""CVE-2004-0001","2004-01-01","","","MEDIUM","First entry""#,
        ]
    );
}

#[test]
fn test_malformed_feed_reports_line() {
    let xml = load_fixture("nvdcve-malformed.xml");
    let mut out = Vec::new();
    let err = convert(xml.as_bytes(), &mut out, RowFormat::default()).unwrap_err();

    match err {
        NvdError::MalformedInput { line, .. } => assert_eq!(line, 6),
        other => panic!("expected malformed input, got {other:?}"),
    }
    assert_eq!(String::from_utf8(out).unwrap(), format!("{HEADER}\n"));
}

#[test]
fn test_convert_source_from_file() {
    let source = FeedSource::Path(fixture_path("nvdcve-sample.xml"));
    let mut out = Vec::new();
    let summary = convert_source(&source, &mut out, &ConvertOptions::default()).unwrap();

    assert_eq!(summary.entries, 3);
    assert!(String::from_utf8(out).unwrap().starts_with(HEADER));
}

#[test]
fn test_large_feed_streams_across_chunks() {
    let mut xml = String::from("<nvd>\n");
    for i in 0..500 {
        xml.push_str(&format!(
            "<entry name=\"CVE-2004-{i:04}\" published=\"2004-01-01\" CVSS_base_score=\"{}\">\
             <desc><descript source=\"cve\">Entry {i} with a &quot;quoted&quot; word</descript></desc></entry>\n",
            i % 10
        ));
    }
    xml.push_str("</nvd>\n");

    let mut out = Vec::new();
    let summary = convert(xml.as_bytes(), &mut out, RowFormat::default()).unwrap();
    assert_eq!(summary.rows, 500);

    let table = String::from_utf8(out).unwrap();
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines.len(), 501);
    assert_eq!(
        lines[500],
        r#""CVE-2004-0499","2004-01-01","","","HIGH","Entry 499 with a ""quoted"" word""#
    );
    assert_eq!(
        lines[4],
        r#""CVE-2004-0003","2004-01-01","","","LOW","Entry 3 with a ""quoted"" word""#
    );
}
