//! JSON Lines reader.

use okay_contracts::error::{OkayError, OkayResult};
use okay_contracts::message::{kinds, Message};
use serde_json::Value;
use tracing::{debug, warn};

use crate::source::{Source, Store, Stores};

/// One parsed line.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// 1-based position among the non-blank lines of the whole source.
    pub number: u64,
    pub contents: Value,
    /// Name of the store the line came from.
    pub store: String,
}

/// Reads one JSON document per line from every store of a source.
///
/// Blank lines are skipped and do not consume a document number. A line
/// that is not valid JSON (including one that is not valid UTF-8) consumes
/// its number and is recorded as a `malformed_json` message instead of
/// being yielded.
#[derive(Debug)]
pub struct JsonLinesReader<S> {
    source: S,
    messages: Vec<Message>,
}

impl<S: Source> JsonLinesReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            messages: Vec::new(),
        }
    }

    /// Iterate over the documents of every store, in store order.
    pub fn documents(&mut self) -> OkayResult<Documents<'_>> {
        Ok(Documents {
            stores: self.source.stores()?,
            current: None,
            next_number: 1,
            line: Vec::new(),
            messages: &mut self.messages,
        })
    }

    /// Malformed-line messages collected so far.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}

/// Iterator returned by [`JsonLinesReader::documents`].
pub struct Documents<'r> {
    stores: Stores,
    current: Option<Store>,
    next_number: u64,
    line: Vec<u8>,
    messages: &'r mut Vec<Message>,
}

impl Iterator for Documents<'_> {
    type Item = OkayResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                match self.stores.next()? {
                    Ok(store) => {
                        debug!(store = %store.name, "reading store");
                        self.current = Some(store);
                    }
                    Err(e) => return Some(Err(e)),
                }
            }
            let store = self.current.as_mut()?;

            self.line.clear();
            let read = match store.reader.read_until(b'\n', &mut self.line) {
                Ok(read) => read,
                Err(e) => {
                    return Some(Err(OkayError::Io {
                        reason: format!("failed to read '{}': {}", store.name, e),
                    }))
                }
            };
            if read == 0 {
                self.current = None;
                continue;
            }
            if self.line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let number = self.next_number;
            self.next_number += 1;

            match serde_json::from_slice(&self.line) {
                Ok(contents) => {
                    return Some(Ok(Document {
                        number,
                        contents,
                        store: store.name.clone(),
                    }))
                }
                Err(e) => {
                    warn!(
                        store = %store.name,
                        document_number = number,
                        error = %e,
                        "skipping malformed line"
                    );
                    self.messages.push(
                        Message::new(kinds::MALFORMED_JSON, ".")
                            .with("document_number", number)
                            .with("store", store.name.as_str())
                            .with("extra", e.to_string()),
                    );
                }
            }
        }
    }
}
