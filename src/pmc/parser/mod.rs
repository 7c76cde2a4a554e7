//! Text extraction from PMC NXML documents
//!
//! Walks `article/body`: each direct child of `body` is a section, each child
//! of a section a part. A `title` part whose text is not on the allow-list ends
//! the section; every other part with leading text becomes one paragraph made of
//! that text followed by the tails of its direct children.

pub mod sections;
pub mod tree;

pub use sections::{SectionKind, keep_section_title};
pub use tree::XmlElement;

use crate::error::Result;
use crate::pmc::models::DocumentText;
use tracing::{debug, instrument};

/// Extract the retained paragraphs of an NXML document
///
/// A document without a `body` element yields no paragraphs.
///
/// # Errors
///
/// * `CorpusError::XmlError` - If the document is not well-formed XML
///
/// # Example
///
/// ```
/// use pmc_corpus::pmc::parser::extract_document_text;
///
/// let xml = "<article><body><sec><title>Results and Discussion</title><p>P1</p></sec></body></article>";
/// let doc = extract_document_text(xml, "PMC1").unwrap();
/// assert_eq!(doc.joined(), "Results and Discussion\n\nP1");
/// ```
#[instrument(skip(xml), fields(pmcid = %pmcid, bytes = xml.len()))]
pub fn extract_document_text(xml: &str, pmcid: &str) -> Result<DocumentText> {
    let root = XmlElement::parse(xml)?;
    let paragraphs = extract_paragraphs(&root);
    debug!(paragraphs = paragraphs.len(), "Extracted document text");
    Ok(DocumentText::new(pmcid, paragraphs))
}

/// Collect titles and paragraphs from the allow-listed sections under `root`'s `body`
pub fn extract_paragraphs(root: &XmlElement) -> Vec<String> {
    let Some(body) = root.child("body") else {
        debug!(root = %root.name, "Document has no body");
        return Vec::new();
    };

    let mut paragraphs = Vec::new();
    for section in &body.children {
        for part in retained_parts(section) {
            if part.is("title") {
                if let Some(title) = &part.text {
                    paragraphs.push(title.clone());
                }
            } else if let Some(paragraph) = paragraph_text(part) {
                paragraphs.push(paragraph);
            }
        }
    }
    paragraphs
}

/// The parts of a section up to (not including) its first rejected title
fn retained_parts(section: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    section
        .children
        .iter()
        .take_while(|part| !part.is("title") || keep_section_title(part.text.as_deref()))
}

/// Leading text plus the tails of the direct children; the inline elements'
/// own text is dropped. Parts without leading text yield nothing.
fn paragraph_text(part: &XmlElement) -> Option<String> {
    let text = part.text.as_deref().filter(|text| !text.is_empty())?;

    let mut paragraph = text.to_string();
    for child in &part.children {
        if let Some(tail) = &child.tail {
            paragraph.push_str(tail);
        }
    }
    Some(paragraph)
}
