//! Owned element tree for NXML documents
//!
//! Each element keeps its leading text (before the first child) and its tail
//! (text between its end tag and the next sibling), so mixed content such as
//! `<p>A<xref>1</xref>B</p>` stays addressable piece by piece.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{CorpusError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,
    /// Text before the first child element
    pub text: Option<String>,
    /// Text after this element's end tag, up to the next sibling
    pub tail: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_start(e: &BytesStart) -> Self {
        Self {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            ..Self::default()
        }
    }

    /// Parse a document and return its root element
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = make_reader(xml);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => stack.push(Self::from_start(e)),
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e);
                    if let Some(root) = attach(&mut stack, element) {
                        return Ok(root);
                    }
                }
                Ok(Event::End(_)) => {
                    let Some(element) = stack.pop() else {
                        return Err(CorpusError::XmlError("unbalanced end tag".to_string()));
                    };
                    if let Some(root) = attach(&mut stack, element) {
                        return Ok(root);
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| CorpusError::XmlError(err.to_string()))?;
                    push_text(&mut stack, &text);
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    push_text(&mut stack, &text);
                }
                Ok(Event::Eof) => {
                    return Err(CorpusError::XmlError(
                        "document ended before the root element was closed".to_string(),
                    ));
                }
                Err(e) => {
                    return Err(CorpusError::XmlError(format!(
                        "error at position {}: {e}",
                        reader.buffer_position()
                    )));
                }
                // declarations, doctype, comments, processing instructions
                _ => {}
            }
            buf.clear();
        }
    }

    /// First direct child with the given tag name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

fn make_reader(xml: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().expand_empty_elements = true;
    reader
}

/// Hang a finished element under its parent; returns it when it is the root
fn attach(stack: &mut [XmlElement], element: XmlElement) -> Option<XmlElement> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            None
        }
        None => Some(element),
    }
}

/// Text goes to the open element's `text` until it has children, then to the
/// last child's `tail`. Text outside the root is dropped.
fn push_text(stack: &mut [XmlElement], text: &str) {
    let Some(current) = stack.last_mut() else {
        return;
    };
    let slot = match current.children.last_mut() {
        Some(last) => &mut last.tail,
        None => &mut current.text,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}
