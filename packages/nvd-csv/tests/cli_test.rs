//! Tests for the `nvd-csv` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn nvd_csv() -> Command {
    let mut cmd = Command::cargo_bin("nvd-csv").expect("binary should be built");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_converts_local_file_to_stdout() {
    nvd_csv()
        .arg(fixture_path("nvdcve-sample.xml"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\"CVE\",\"Published Date\""))
        .stdout(predicate::str::contains(
            "\"CVE-2004-0002\",\"2004-01-15\",\"\",\"\",\"HIGH\",\"Buffer overflow\",\"Acme\",\"Widget\",\"1.0\"\n",
        ))
        .stderr(predicate::str::contains(
            "Found 3 entries in this NVD location",
        ))
        .stderr(predicate::str::contains(
            "NVD integrity alert: no vendor for product Gadget, CVE is CAN-2003-0100",
        ));
}

#[test]
fn test_html_flag() {
    nvd_csv()
        .arg(fixture_path("nvdcve-sample.xml"))
        .arg("--html")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"<a href=\"\"https://web.nvd.nist.gov/view/vuln/detail?vulnId=CVE-2005-1234\"\">CVE-2005-1234</a>\"",
        ))
        .stdout(predicate::str::ends_with("<br>\n"));
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nvd.csv");

    nvd_csv()
        .arg(fixture_path("nvdcve-sample.xml"))
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let table = fs::read_to_string(&out).unwrap();
    assert_eq!(table.lines().count(), 4);
    assert!(table.contains("\"CVE-2005-1234\",\"2005-06-30\",\"\",\"\",\"LOW\"\n"));
}

#[test]
fn test_output_directory_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing").join("nvd.csv");

    nvd_csv()
        .arg(fixture_path("nvdcve-sample.xml"))
        .arg("--output")
        .arg(&out)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Output directory does not exist"));
}

#[test]
fn test_invalid_identifier_aborts() {
    nvd_csv()
        .arg(fixture_path("nvdcve-invalid-name.xml"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"CVE-2004-0001\""))
        .stdout(predicate::str::contains("Second entry").not())
        .stderr(predicate::str::contains(
            "Error: Invalid CVE number encountered: 'BID-9999'",
        ))
        .stderr(predicate::str::contains("Found").not());
}

#[test]
fn test_malformed_input_reports_line() {
    nvd_csv()
        .arg(fixture_path("nvdcve-malformed.xml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: XML error:"))
        .stderr(predicate::str::contains("at line 6"));
}

#[test]
fn test_missing_file() {
    nvd_csv()
        .arg("/nonexistent/nvdcve-2004.xml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Could not open XML input '/nonexistent/nvdcve-2004.xml'",
        ));
}

/// Run the binary against a URL off the async runtime.
async fn run_against(url: String) -> Output {
    tokio::task::spawn_blocking(move || nvd_csv().arg(url).output().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_converts_feed_from_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/nvdcve-recent.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(fs::read_to_string(fixture_path("nvdcve-sample.xml")).unwrap()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(format!("{}/download/nvdcve-recent.xml", server.uri())).await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.contains("\"CAN-2003-0100\",\"2003-03-18\",\"3.5\",\"Medium\",\"MEDIUM\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_error_status_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(format!("{}/download/missing.xml", server.uri())).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("HTTP request failed"), "stderr was: {stderr}");
    assert!(output.stdout.is_empty());
}
