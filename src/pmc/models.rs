use serde::{Deserialize, Serialize};

/// Download format tag of the compressed article package
pub const TGZ_FORMAT: &str = "tgz";

/// Paragraph text kept from one article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    /// PMC ID (e.g., "PMC10609202")
    pub pmcid: String,
    /// Retained titles and paragraphs, in document order
    pub paragraphs: Vec<String>,
}

impl DocumentText {
    pub fn new<S: Into<String>>(pmcid: S, paragraphs: Vec<String>) -> Self {
        Self {
            pmcid: pmcid.into(),
            paragraphs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Paragraphs joined with a blank line between them
    pub fn joined(&self) -> String {
        self.paragraphs.join("\n\n")
    }
}

/// One row of an ID Converter response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdConversion {
    /// The identifier as it was requested
    pub requested_id: Option<String>,
    pub pmid: Option<String>,
    /// Absent when the article is not in PMC
    pub pmcid: Option<String>,
}

/// A `link` entry of an Open Access record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OaLink {
    pub format: Option<String>,
    pub href: Option<String>,
    pub updated: Option<String>,
}

impl OaLink {
    pub fn is_tgz(&self) -> bool {
        self.format.as_deref() == Some(TGZ_FORMAT)
    }
}

/// Open Access record for one PMCID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OaRecord {
    pub pmcid: String,
    pub license: Option<String>,
    pub links: Vec<OaLink>,
}

impl OaRecord {
    /// The href of the first `tgz` link, if any
    pub fn tgz_href(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.is_tgz())
            .and_then(|link| link.href.as_deref())
    }
}
