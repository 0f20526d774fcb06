//! Event handler trait definition.

use std::collections::HashMap;

use crate::error::Result;

/// Attributes of one start tag, keyed by upper-cased attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(HashMap<String, String>);

impl Attributes {
    /// Create an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute. The name is folded to upper case.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_uppercase(), value.into());
    }

    /// Look up an attribute by its upper-case name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Look up an attribute, treating a missing one as empty.
    #[must_use]
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            attrs.insert(name.as_ref(), value);
        }
        attrs
    }
}

/// Trait for consumers of the XML event stream.
///
/// Element names arrive upper-cased. Text between tags may be split across
/// several `character_data` calls; consumers must concatenate. Returning an
/// error stops the stream and hands the error back to the caller of
/// [`EventDispatcher::run`](super::EventDispatcher::run).
pub trait EventHandler {
    /// An element was opened.
    fn start_element(&mut self, name: &str, attrs: &Attributes) -> Result<()>;

    /// An element was closed.
    fn end_element(&mut self, name: &str) -> Result<()>;

    /// A run of character data (entities resolved, CDATA included).
    fn character_data(&mut self, data: &str) -> Result<()>;
}
