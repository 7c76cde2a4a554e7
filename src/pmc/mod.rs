//! PubMed Central: ID conversion, Open Access lookup, package download and
//! NXML text extraction

pub mod client;
pub mod idconv;
pub mod models;
pub mod oa;
pub mod parser;
pub mod tar;

pub use client::{PmcClient, normalize_pmcid};
pub use models::{DocumentText, IdConversion, OaLink, OaRecord};
pub use parser::{SectionKind, extract_document_text};
pub use tar::TempArchive;
