use std::io::BufRead;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::XidlError;

/// Attributes of an opening tag, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Attributes(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Treats `"yes"` as true, anything else (or absence) as false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("yes")
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One step of the schema document, in document order.
///
/// Self-closing tags are reported as an `Open` immediately followed by a
/// `Close`, so consumers only ever deal with balanced pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum TagEvent {
    Open {
        name:       String,
        attributes: Attributes,
    },
    Text(String),
    Close,
}

impl TagEvent {
    pub fn open(name: &str, attributes: &[(&str, &str)]) -> Self {
        TagEvent::Open {
            name:       name.to_string(),
            attributes: attributes.iter().copied().collect(),
        }
    }
}

/// Pull-based event stream over any buffered reader.
pub struct TagStream<R> {
    reader:        Reader<R>,
    buf:           Vec<u8>,
    pending_close: bool,
    done:          bool,
}

impl<R: BufRead> TagStream<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        // Whitespace inside <desc> is significant for the rendered comments.
        reader.config_mut().trim_text(false);
        TagStream {
            reader,
            buf: Vec::new(),
            pending_close: false,
            done: false,
        }
    }

    /// Byte offset just past the last event read.
    pub fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    /// Returns the next event, or `None` at end of document.
    pub fn next_event(&mut self) -> Result<Option<TagEvent>, XidlError> {
        if self.pending_close {
            self.pending_close = false;
            return Ok(Some(TagEvent::Close));
        }

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(ref e) => return Ok(Some(open_event(e)?)),
                Event::Empty(ref e) => {
                    self.pending_close = true;
                    return Ok(Some(open_event(e)?));
                }
                Event::End(_) => return Ok(Some(TagEvent::Close)),
                Event::Text(ref t) => {
                    let raw = std::str::from_utf8(t.as_ref())?;
                    if !raw.is_empty() {
                        return Ok(Some(TagEvent::Text(unescape(raw)?.into_owned())));
                    }
                }
                Event::CData(ref c) => {
                    let raw = std::str::from_utf8(c.as_ref())?;
                    if !raw.is_empty() {
                        return Ok(Some(TagEvent::Text(raw.to_string())));
                    }
                }
                Event::GeneralRef(ref r) => {
                    let name = std::str::from_utf8(r.as_ref())?;
                    return Ok(Some(TagEvent::Text(resolve_reference(name))));
                }
                Event::Eof => return Ok(None),
                // Declarations, comments, processing instructions, doctype.
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for TagStream<R> {
    type Item = Result<TagEvent, XidlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn open_event(e: &BytesStart<'_>) -> Result<TagEvent, XidlError> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    // Malformed attributes are dropped rather than failing the run.
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let raw = std::str::from_utf8(&attr.value)?;
        attributes.push((key, unescape(raw)?.into_owned()));
    }
    Ok(TagEvent::Open {
        name,
        attributes: Attributes::new(attributes),
    })
}

/// Resolves `&name;` references that arrive as their own event.
fn resolve_reference(name: &str) -> String {
    let resolved = match name {
        "lt"   => Some('<'),
        "gt"   => Some('>'),
        "amp"  => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => name
            .strip_prefix("#x")
            .map(|hex| u32::from_str_radix(hex, 16).ok())
            .unwrap_or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
            .and_then(char::from_u32),
    };
    match resolved {
        Some(ch) => ch.to_string(),
        None     => format!("&{};", name),
    }
}

/// Reads a whole document into memory as events.
pub fn tokenize_schema(text: &str) -> Result<Vec<TagEvent>, XidlError> {
    TagStream::new(text.as_bytes()).collect()
}
