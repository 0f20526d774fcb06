//! Chunked pull loop over `quick-xml` that drives an [`EventHandler`].

use std::io::{self, BufReader, Read};
use std::str;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;

use super::handler::{Attributes, EventHandler};
use super::lines::LineCounter;
use crate::config::READ_CHUNK_SIZE;
use crate::error::{NvdError, Result};

/// Owned copy of one tokenizer event, so the read buffer can be reused
/// before the handler runs.
enum ParsedEvent {
    Start { name: String, attrs: Attributes },
    Empty { name: String, attrs: Attributes },
    End { name: String },
    Text(String),
    Eof,
}

/// Streaming event source over any byte reader.
///
/// Reads the source in `READ_CHUNK_SIZE` chunks and calls the handler for
/// every start tag, end tag and text run, in document order, before the next
/// chunk is read. Tag and attribute names are upper-cased here because the
/// tokenizer does not fold case.
pub struct EventDispatcher<R: Read> {
    reader: Reader<LineCounter<BufReader<R>>>,
    buf: Vec<u8>,
    depth: usize,
    seen_root: bool,
}

impl<R: Read> EventDispatcher<R> {
    pub fn new(source: R) -> Self {
        let counter = LineCounter::new(BufReader::with_capacity(READ_CHUNK_SIZE, source));
        let mut reader = Reader::from_reader(counter);
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = true;

        Self {
            reader,
            buf: Vec::with_capacity(READ_CHUNK_SIZE),
            depth: 0,
            seen_root: false,
        }
    }

    /// Current 1-based line in the source.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.reader.get_ref().line()
    }

    /// Feed the whole document to `handler`.
    ///
    /// Stops at the first well-formedness error, read failure, or handler
    /// error.
    pub fn run<H: EventHandler>(mut self, handler: &mut H) -> Result<()> {
        loop {
            match self.next_event()? {
                ParsedEvent::Start { name, attrs } => {
                    self.check_single_root()?;
                    self.depth += 1;
                    self.seen_root = true;
                    handler.start_element(&name, &attrs)?;
                }
                ParsedEvent::Empty { name, attrs } => {
                    self.check_single_root()?;
                    self.seen_root = true;
                    handler.start_element(&name, &attrs)?;
                    handler.end_element(&name)?;
                }
                ParsedEvent::End { name } => {
                    self.depth = self.depth.saturating_sub(1);
                    handler.end_element(&name)?;
                }
                ParsedEvent::Text(text) => {
                    if self.depth == 0 {
                        // only whitespace may surround the root element
                        if !text.trim().is_empty() {
                            return Err(self.outside_root());
                        }
                    } else if !text.is_empty() {
                        handler.character_data(&text)?;
                    }
                }
                ParsedEvent::Eof => {
                    if !self.seen_root {
                        return Err(self.malformed("no element found"));
                    }
                    if self.depth > 0 {
                        return Err(self.malformed("unclosed token at end of input"));
                    }
                    return Ok(());
                }
            }
        }
    }

    fn next_event(&mut self) -> Result<ParsedEvent> {
        loop {
            self.buf.clear();

            let parsed: std::result::Result<Option<ParsedEvent>, String> =
                match self.reader.read_event_into(&mut self.buf) {
                    Ok(XmlEvent::Start(ref e)) => start_tag(e)
                        .map(|(name, attrs)| Some(ParsedEvent::Start { name, attrs })),
                    Ok(XmlEvent::Empty(ref e)) => start_tag(e)
                        .map(|(name, attrs)| Some(ParsedEvent::Empty { name, attrs })),
                    Ok(XmlEvent::End(ref e)) => decode_name(e.local_name().as_ref())
                        .map(|name| Some(ParsedEvent::End { name })),
                    Ok(XmlEvent::Text(ref e)) => e
                        .unescape()
                        .map(|text| Some(ParsedEvent::Text(text.into_owned())))
                        .map_err(|err| err.to_string()),
                    Ok(XmlEvent::CData(ref e)) => str::from_utf8(e)
                        .map(|text| Some(ParsedEvent::Text(text.to_string())))
                        .map_err(|err| err.to_string()),
                    Ok(XmlEvent::Eof) => Ok(Some(ParsedEvent::Eof)),
                    Ok(_) => Ok(None),
                    Err(quick_xml::Error::Io(err)) => {
                        return Err(NvdError::Read(io::Error::new(err.kind(), err.to_string())));
                    }
                    Err(err) => Err(err.to_string()),
                };

            match parsed {
                Ok(Some(event)) => return Ok(event),
                Ok(None) => {}
                Err(message) => return Err(self.malformed(message)),
            }
        }
    }

    fn check_single_root(&self) -> Result<()> {
        if self.seen_root && self.depth == 0 {
            return Err(self.outside_root());
        }
        Ok(())
    }

    fn outside_root(&self) -> NvdError {
        if self.seen_root {
            self.malformed("junk after document element")
        } else {
            self.malformed("syntax error")
        }
    }

    fn malformed(&self, message: impl Into<String>) -> NvdError {
        NvdError::MalformedInput {
            message: message.into(),
            line: self.line(),
        }
    }
}

fn decode_name(raw: &[u8]) -> std::result::Result<String, String> {
    str::from_utf8(raw)
        .map(str::to_uppercase)
        .map_err(|err| err.to_string())
}

/// Decode the name and attributes of a start tag.
fn start_tag(e: &BytesStart<'_>) -> std::result::Result<(String, Attributes), String> {
    let name = decode_name(e.local_name().as_ref())?;
    let mut attrs = Attributes::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = str::from_utf8(attr.key.as_ref()).map_err(|err| err.to_string())?;
        let value = attr.unescape_value().map_err(|err| err.to_string())?;
        attrs.insert(key, value.into_owned());
    }
    Ok((name, attrs))
}
