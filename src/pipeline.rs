//! End-to-end collection: search, convert, fetch and write

use crate::config::ClientConfig;
use crate::error::Result;
use crate::output::CorpusWriter;
use crate::pmc::PmcClient;
use crate::pubmed::{PubMedClient, SearchQuery};
use tracing::{info, instrument, warn};

/// Run-level options
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Abort on the first per-article fetch failure instead of skipping it
    pub fail_fast: bool,
}

/// What happened to one PMCID in the fetch stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Text was written to the output
    Written { paragraphs: usize },
    /// The document had no retained paragraphs; nothing was written
    Empty,
    /// No OA record or no `tgz` package
    Unavailable,
    /// Download, archive or parse failure (skipped)
    Failed(String),
}

/// Counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pmids: usize,
    pub pmcids: usize,
    pub written: usize,
    pub empty: usize,
    pub unavailable: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &DocumentOutcome) {
        match outcome {
            DocumentOutcome::Written { .. } => self.written += 1,
            DocumentOutcome::Empty => self.empty += 1,
            DocumentOutcome::Unavailable => self.unavailable += 1,
            DocumentOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// PMCIDs that produced no output
    pub fn skipped(&self) -> usize {
        self.empty + self.unavailable + self.failed
    }
}

/// Sequential three-stage collector
///
/// # Example
///
/// ```no_run
/// use pmc_corpus::{ClientConfig, CorpusWriter, Pipeline, pubmed::SearchQuery};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pipeline = Pipeline::new(ClientConfig::new().with_tool("proteostasisGPT"))?;
///     let query = SearchQuery::new()
///         .title_keyword("proteostasis")
///         .published_between((2021, 1, 1), Some(3000));
///
///     let mut writer = CorpusWriter::create("proteostasis_gtp_text.txt")?;
///     let summary = pipeline.run(&query, &mut writer, |_, _| {}).await?;
///     writer.finish()?;
///
///     println!("Wrote {} documents", summary.written);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Pipeline {
    pubmed: PubMedClient,
    pmc: PmcClient,
    config: PipelineConfig,
}

impl Pipeline {
    /// Build both clients from one configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_clients(
            PubMedClient::with_config(config.clone())?,
            PmcClient::with_config(config)?,
        ))
    }

    pub fn with_clients(pubmed: PubMedClient, pmc: PmcClient) -> Self {
        Self {
            pubmed,
            pmc,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_pipeline_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.fail_fast = fail_fast;
        self
    }

    /// Query and resolution stages: search PMIDs and convert them to PMCIDs
    ///
    /// Transport failures here abort the run.
    pub async fn collect_pmcids(&self, query: &SearchQuery) -> Result<(usize, Vec<String>)> {
        let pmids = self.pubmed.search_all_pmids(query).await?;
        info!(hits = pmids.len(), "Got pubmed hits");

        let pmcids = self.pmc.convert_pmids(&pmids).await?;
        info!(hits = pmcids.len(), "Got PMC hits");

        Ok((pmids.len(), pmcids))
    }

    /// Run all three stages, writing each document as it is extracted
    ///
    /// `on_document` is called once per PMCID after it has been handled.
    pub async fn run<F>(
        &self,
        query: &SearchQuery,
        writer: &mut CorpusWriter,
        on_document: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&str, &DocumentOutcome),
    {
        let (pmids, pmcids) = self.collect_pmcids(query).await?;
        let mut summary = self.process_pmcids(&pmcids, writer, on_document).await?;
        summary.pmids = pmids;
        Ok(summary)
    }

    /// Fetch stage over a list of PMCIDs
    ///
    /// Each PMCID is handled on its own: a failure is logged and skipped
    /// unless `fail_fast` is set. Output write failures always abort.
    #[instrument(skip_all, fields(pmcids = pmcids.len()))]
    pub async fn process_pmcids<F>(
        &self,
        pmcids: &[String],
        writer: &mut CorpusWriter,
        mut on_document: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&str, &DocumentOutcome),
    {
        let mut summary = RunSummary {
            pmcids: pmcids.len(),
            ..RunSummary::default()
        };

        for pmcid in pmcids {
            let outcome = match self.pmc.fetch_document_text(pmcid).await {
                Ok(Some(document)) if document.is_empty() => {
                    info!(pmcid = %pmcid, "No retained sections, nothing written");
                    DocumentOutcome::Empty
                }
                Ok(Some(document)) => {
                    writer.write_document(&document)?;
                    DocumentOutcome::Written {
                        paragraphs: document.paragraphs.len(),
                    }
                }
                Ok(None) => DocumentOutcome::Unavailable,
                Err(e) if self.config.fail_fast => return Err(e),
                Err(e) => {
                    warn!(pmcid = %pmcid, error = %e, "Skipping article");
                    DocumentOutcome::Failed(e.to_string())
                }
            };

            summary.record(&outcome);
            on_document(pmcid, &outcome);
        }

        info!(
            written = summary.written,
            skipped = summary.skipped(),
            "Fetch stage completed"
        );
        Ok(summary)
    }
}
