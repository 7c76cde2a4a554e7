//! # PMC Corpus
//!
//! Builds a plain-text corpus of Introduction, Results and Discussion
//! sections from PubMed Central open-access articles.
//!
//! ## Stages
//!
//! - **Query**: page through a PubMed keyword search and collect PMIDs
//! - **Resolution**: convert PMIDs to PMCIDs in batches through the PMC ID Converter
//! - **Fetch and extract**: resolve each article's `tgz` package through the
//!   Open Access web service, download it to a temporary file, and pull the
//!   allow-listed sections out of the `.nxml` document inside
//!
//! Every stage runs sequentially; articles are processed one at a time and
//! an article that cannot be fetched is skipped without stopping the run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pmc_corpus::{ClientConfig, CorpusWriter, Pipeline, pubmed::SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new()
//!         .with_tool("proteostasisGPT")
//!         .with_email("researcher@university.edu");
//!     let pipeline = Pipeline::new(config)?;
//!
//!     let query = SearchQuery::new()
//!         .title_keyword("proteostasis")
//!         .published_between((2021, 1, 1), Some(3000));
//!
//!     let mut writer = CorpusWriter::create("proteostasis_gtp_text.txt")?;
//!     let summary = pipeline.run(&query, &mut writer, |_, _| {}).await?;
//!     writer.finish()?;
//!
//!     println!("{} of {} articles written", summary.written, summary.pmcids);
//!     Ok(())
//! }
//! ```
//!
//! ### Extracting text from a single article
//!
//! ```no_run
//! use pmc_corpus::PmcClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PmcClient::new()?;
//!     if let Some(doc) = client.fetch_document_text("PMC10609202").await? {
//!         println!("{}", doc.joined());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod pmc;
pub mod pubmed;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use error::{CorpusError, Result};
pub use output::CorpusWriter;
pub use pipeline::{DocumentOutcome, Pipeline, PipelineConfig, RunSummary};
pub use pmc::{DocumentText, PmcClient, SectionKind};
pub use pubmed::{PubDate, PubMedClient, SearchQuery};
