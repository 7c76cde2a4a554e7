use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pmc_corpus::{CorpusWriter, DocumentOutcome, PubDate, SearchQuery};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::Cli;
use crate::commands::create_pipeline;

pub struct CollectOptions {
    pub keyword: String,
    pub from: PubDate,
    pub to: PubDate,
    pub output: PathBuf,
    pub append: bool,
    /// When non-empty, the search and conversion stages are skipped
    pub pmcids: Vec<String>,
    pub timeout_seconds: Option<u64>,
    pub fail_fast: bool,
}

impl CollectOptions {
    fn query(&self) -> SearchQuery {
        SearchQuery::new()
            .title_keyword(&self.keyword)
            .published_between(self.from, Some(self.to))
    }
}

pub async fn execute(options: CollectOptions, cli: &Cli) -> Result<()> {
    let pipeline = create_pipeline(
        cli.email.as_deref(),
        &cli.tool,
        options.timeout_seconds,
        options.fail_fast,
    )?;

    let mut writer = if options.append {
        CorpusWriter::append(&options.output).context("Failed to open output file for appending")?
    } else {
        CorpusWriter::create(&options.output).context("Failed to create output file")?
    };

    let (pmids, pmcids) = if options.pmcids.is_empty() {
        let query = options.query();
        info!(term = %query.build(), "Searching PubMed");
        pipeline
            .collect_pmcids(&query)
            .await
            .context("Failed to collect PMC IDs")?
    } else {
        debug!(count = options.pmcids.len(), "Using PMC IDs given on the command line");
        (0, options.pmcids.clone())
    };

    let progress = ProgressBar::new(pmcids.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} articles ({msg})")
            .context("Failed to set progress bar style")?
            .progress_chars("#>-"),
    );
    progress.set_message("Fetching PMC articles");

    let mut summary = pipeline
        .process_pmcids(&pmcids, &mut writer, |pmcid, outcome| {
            let message = match outcome {
                DocumentOutcome::Written { paragraphs } => {
                    format!("{pmcid}: {paragraphs} paragraphs")
                }
                DocumentOutcome::Empty => format!("{pmcid}: no retained sections"),
                DocumentOutcome::Unavailable => format!("Skipped {pmcid}"),
                DocumentOutcome::Failed(_) => format!("Failed {pmcid}"),
            };
            progress.set_message(message);
            progress.inc(1);
        })
        .await
        .context("Failed to fetch articles")?;
    summary.pmids = pmids;

    progress.finish_with_message(format!(
        "Processed {} articles ({} skipped)",
        summary.pmcids,
        summary.skipped()
    ));

    let written = writer.finish().context("Failed to flush output file")?;

    info!(
        path = %options.output.display(),
        pmids = summary.pmids,
        pmcids = summary.pmcids,
        written,
        "Saved corpus text"
    );

    if summary.failed > 0 {
        warn!(
            failed = summary.failed,
            "Some articles could not be downloaded or parsed"
        );
    }

    Ok(())
}
