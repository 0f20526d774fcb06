//! Line tracking for error reporting.

use std::io::{self, BufRead, Read};

/// A `BufRead` wrapper that counts the newlines consumed through it.
///
/// The tokenizer consumes bytes up to the point where it fails, so the count
/// at that moment gives the line of the error.
#[derive(Debug)]
pub struct LineCounter<R> {
    inner: R,
    newlines: u64,
}

impl<R: BufRead> LineCounter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, newlines: 0 }
    }

    /// 1-based line number of the next unconsumed byte.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.newlines + 1
    }
}

fn count_newlines(bytes: &[u8]) -> u64 {
    bytes.iter().filter(|&&b| b == b'\n').count() as u64
}

impl<R: BufRead> Read for LineCounter<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(out)?;
        self.newlines += count_newlines(&out[..n]);
        Ok(n)
    }
}

impl<R: BufRead> BufRead for LineCounter<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        // Buffer is non-empty whenever amt > 0, so this does not hit the source.
        if amt > 0 {
            if let Ok(buf) = self.inner.fill_buf() {
                let end = amt.min(buf.len());
                self.newlines += count_newlines(&buf[..end]);
            }
        }
        self.inner.consume(amt);
    }
}
