//! Query stage: keyword search against the PubMed literature index

pub mod client;
pub mod query;

pub use client::{PubMedClient, parse_pmid_page};
pub use query::{PubDate, SearchQuery};
