use std::collections::HashSet;

use crate::config::ClientConfig;
use crate::error::{CorpusError, Result};
use crate::pubmed::query::SearchQuery;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

/// Client for the PubMed literature index
///
/// Pages through the `format=pmid` listing of a keyword search and collects
/// the PubMed IDs it returns.
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new PubMed client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pmc_corpus::PubMedClient;
    ///
    /// let client = PubMedClient::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PubMed client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = config.build_http_client()?;
        Ok(Self { client, config })
    }

    /// Create a new PubMed client with custom HTTP client
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Collect every PMID matching `query`
    ///
    /// Requests pages 1, 2, ... and stops at the first page that yields no
    /// numeric identifiers. PMIDs already seen on an earlier page are not
    /// added again; the order is discovery order.
    ///
    /// # Errors
    ///
    /// * `CorpusError::RequestError` - If an HTTP request fails
    /// * `CorpusError::ApiError` - If a page returns a non-success status
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pmc_corpus::{PubMedClient, pubmed::SearchQuery};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     let query = SearchQuery::new()
    ///         .title_keyword("proteostasis")
    ///         .published_between((2021, 1, 1), Some(3000));
    ///     let pmids = client.search_all_pmids(&query).await?;
    ///     println!("Got {} pubmed hits", pmids.len());
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, query), fields(term = %query.build()))]
    pub async fn search_all_pmids(&self, query: &SearchQuery) -> Result<Vec<String>> {
        let term = query.build();
        if term.trim().is_empty() {
            return Err(CorpusError::InvalidQuery(
                "search term must not be empty".to_string(),
            ));
        }

        let mut pmids = Vec::new();
        let mut seen = HashSet::new();
        let mut page = 0;

        loop {
            page += 1;
            info!(page, "Trying page");

            let page_pmids = self.fetch_page(&term, page).await?;
            if page_pmids.is_empty() {
                debug!(page, "Empty page, pagination finished");
                break;
            }

            let found = page_pmids.len();
            let mut repeated = 0;
            for pmid in page_pmids {
                if seen.insert(pmid.clone()) {
                    pmids.push(pmid);
                } else {
                    repeated += 1;
                }
            }
            if repeated > 0 {
                warn!(page, repeated, "Page repeated identifiers from earlier pages");
            }
            debug!(page, found, total = pmids.len(), "Page collected");
        }

        info!(hits = pmids.len(), pages = page - 1, "Search completed");
        Ok(pmids)
    }

    /// Fetch one result page and parse the PMIDs on it
    pub async fn fetch_page(&self, term: &str, page: usize) -> Result<Vec<String>> {
        let url = self.build_search_url(term, page);
        debug!(url = %url, "Making search page request");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            warn!("Search page request failed with status: {}", response.status());
            return Err(CorpusError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        let body = response.text().await?;
        Ok(parse_pmid_page(&body))
    }

    fn build_search_url(&self, term: &str, page: usize) -> String {
        format!(
            "{}/?format=pmid&sort=date&size={}&term={}&page={}",
            self.config.search_base_url.trim_end_matches('/'),
            self.config.page_size,
            urlencoding::encode(term),
            page
        )
    }
}

/// Parse a `format=pmid` result page
///
/// One hit per line; the PMID is the first whitespace-delimited token.
/// Blank lines and lines whose first token is not purely numeric are skipped.
pub fn parse_pmid_page(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|token| token.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}
