use anyhow::Result;
use clap::Parser;
use pmc_corpus::PubDate;
use std::path::PathBuf;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(
    name = "pmc-corpus",
    about = "Collect Introduction, Results and Discussion text from PMC open-access articles",
    long_about = "Searches PubMed for a title keyword within a publication date range, converts the hits \
                  to PMC IDs, downloads each open-access package and writes the retained sections \
                  to a flat text file, one line per article"
)]
pub struct Cli {
    /// Keyword that must appear in the article title
    #[arg(short, long, default_value = "proteostasis")]
    keyword: String,

    /// Start of the publication date range (YYYY, YYYY/MM or YYYY/MM/DD)
    #[arg(long, default_value = "2021/01/01")]
    from: PubDate,

    /// End of the publication date range
    #[arg(long, default_value = "3000")]
    to: PubDate,

    /// Output text file
    #[arg(short, long, default_value = "proteostasis_gtp_text.txt")]
    output: PathBuf,

    /// Append to an existing output file instead of overwriting it
    #[arg(short, long)]
    append: bool,

    /// Process these PMC IDs only, skipping the search and conversion stages
    #[arg(long = "pmcid", value_name = "PMCID")]
    pmcids: Vec<String>,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "pmc-corpus")]
    tool: String,

    /// HTTP request timeout in seconds (default: none)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Abort the run on the first article that fails to download or parse
    #[arg(long)]
    fail_fast: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with indicatif layer for progress bars
    let filter = if cli.verbose { "debug" } else { "info" };

    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let options = commands::collect::CollectOptions {
        keyword: cli.keyword.clone(),
        from: cli.from,
        to: cli.to,
        output: cli.output.clone(),
        append: cli.append,
        pmcids: cli.pmcids.clone(),
        timeout_seconds: cli.timeout,
        fail_fast: cli.fail_fast,
    };
    commands::collect::execute(options, &cli).await
}
