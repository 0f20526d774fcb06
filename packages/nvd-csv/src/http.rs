//! HTTP client wrapper for streaming feeds from a URL.

use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::error::Result;

/// User agent string identifying this converter.
const USER_AGENT: &str = concat!("nvd-csv/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Arguments
/// * `timeout_secs` - Timeout for the whole request, body included
///
/// # Returns
/// A `reqwest::blocking::Client` configured with timeout and user agent.
pub fn create_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Start a GET request and return the response for streaming.
///
/// The body is not read here; the returned `Response` implements `Read`.
/// Failures are not retried, and any non-success status is an error.
pub fn open_stream(client: &Client, url: &str) -> Result<Response> {
    tracing::debug!(url, "Requesting feed");
    let response = client.get(url).send()?.error_for_status()?;
    tracing::debug!(
        status = %response.status(),
        content_length = ?response.content_length(),
        "Feed response received"
    );
    Ok(response)
}
