//! Feed locators: local files and HTTP(S) URLs.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::error::{NvdError, Result};
use crate::http::{create_client, open_stream};

/// Where a feed is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// A file on the local filesystem.
    Path(PathBuf),

    /// An `http://` or `https://` URL.
    Url(String),
}

impl FeedSource {
    /// Classify a locator given on the command line.
    ///
    /// # Examples
    /// ```
    /// use nvd_csv::source::FeedSource;
    ///
    /// assert!(matches!(FeedSource::parse("nvdcve-2004.xml"), FeedSource::Path(_)));
    /// assert!(matches!(
    ///     FeedSource::parse("https://nvd.nist.gov/download/nvdcve-2004.xml"),
    ///     FeedSource::Url(_)
    /// ));
    /// ```
    #[must_use]
    pub fn parse(locator: &str) -> Self {
        let lower = locator.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(locator.to_string())
        } else {
            Self::Path(PathBuf::from(locator))
        }
    }

    /// Open the source for streaming.
    ///
    /// Nothing is read yet; the caller pulls chunks from the returned reader.
    pub fn open_with_timeout(&self, timeout_secs: u64) -> Result<Box<dyn Read>> {
        match self {
            Self::Path(path) => {
                let file = File::open(path).map_err(|source| NvdError::SourceOpen {
                    locator: path.display().to_string(),
                    source,
                })?;
                Ok(Box::new(file))
            }
            Self::Url(url) => {
                let client = create_client(timeout_secs)?;
                let response = open_stream(&client, url)?;
                Ok(Box::new(response))
            }
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}
