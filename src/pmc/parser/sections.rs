//! Allow-list of the body sections worth keeping

use std::fmt;

/// Body sections retained in the corpus
///
/// Anything else (methods, acknowledgements, references, supplementary
/// material, ...) is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Introduction,
    Results,
    Discussion,
}

impl SectionKind {
    /// Classify a section title by case-insensitive substring match
    ///
    /// `"intro"`, `"result"` and `"discus"` are checked in that order, so a
    /// combined "Results and Discussion" title classifies as `Results`.
    ///
    /// ```
    /// use pmc_corpus::pmc::parser::SectionKind;
    ///
    /// assert_eq!(SectionKind::classify("1. INTRODUCTION"), Some(SectionKind::Introduction));
    /// assert_eq!(SectionKind::classify("Materials and Methods"), None);
    /// ```
    pub fn classify(title: &str) -> Option<Self> {
        let lower = title.to_lowercase();
        if lower.contains("intro") {
            Some(SectionKind::Introduction)
        } else if lower.contains("result") {
            Some(SectionKind::Results)
        } else if lower.contains("discus") {
            Some(SectionKind::Discussion)
        } else {
            None
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Introduction => "introduction",
            SectionKind::Results => "results",
            SectionKind::Discussion => "discussion",
        };
        f.write_str(name)
    }
}

/// Keep/drop decision for a title's direct text; a title without text is dropped
pub fn keep_section_title(title: Option<&str>) -> bool {
    title.and_then(SectionKind::classify).is_some()
}
