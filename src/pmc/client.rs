use crate::config::ClientConfig;
use crate::error::{CorpusError, Result};
use crate::pmc::idconv::parse_idconv_response;
use crate::pmc::models::{DocumentText, IdConversion, OaRecord};
use crate::pmc::oa::{ftp_to_https, parse_oa_response};
use crate::pmc::parser::extract_document_text;
use crate::pmc::tar::TempArchive;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

/// Client for the PMC ID Converter, the Open Access web service and the
/// article package downloads it points to
#[derive(Clone)]
pub struct PmcClient {
    client: Client,
    config: ClientConfig,
}

impl PmcClient {
    /// Create a new PMC client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pmc_corpus::PmcClient;
    ///
    /// let client = PmcClient::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PMC client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pmc_corpus::{ClientConfig, PmcClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_tool("proteostasisGPT")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = PmcClient::with_config(config).unwrap();
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = config.build_http_client()?;
        Ok(Self { client, config })
    }

    /// Create a new PMC client with custom HTTP client
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Convert PMIDs to PMCIDs
    ///
    /// Sends the PMIDs in consecutive batches of `config.batch_size` and
    /// returns the PMCIDs found, in batch order and response order within a
    /// batch. PMIDs that are not in PMC contribute nothing.
    ///
    /// # Errors
    ///
    /// * `CorpusError::RequestError` - If an HTTP request fails
    /// * `CorpusError::ApiError` - If the converter returns a non-success status
    /// * `CorpusError::XmlError` - If a response cannot be parsed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pmc_corpus::PmcClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PmcClient::new()?;
    ///     let pmids = vec!["23193287".to_string(), "37891234".to_string()];
    ///     let pmcids = client.convert_pmids(&pmids).await?;
    ///     println!("Got {} PMC hits", pmcids.len());
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, pmids), fields(pmids = pmids.len()))]
    pub async fn convert_pmids(&self, pmids: &[String]) -> Result<Vec<String>> {
        let mut pmcids = Vec::new();

        for (index, batch) in pmids.chunks(self.config.batch_size).enumerate() {
            let start = index * self.config.batch_size;
            info!(start, end = start + batch.len(), "Converting batch");

            let records = self.convert_batch(batch).await?;
            let before = pmcids.len();
            pmcids.extend(records.into_iter().filter_map(|record| record.pmcid));
            debug!(
                requested = batch.len(),
                converted = pmcids.len() - before,
                "Batch converted"
            );
        }

        Ok(pmcids)
    }

    /// Send one ID Converter request for `batch` and return its records
    pub async fn convert_batch(&self, batch: &[String]) -> Result<Vec<IdConversion>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}?{}&ids={}",
            self.config.idconv_base_url,
            self.config.encoded_api_params(),
            batch.join(",")
        );

        let response = self.get(&url).await?;
        let xml = response.text().await?;
        parse_idconv_response(&xml)
    }

    /// Look up the Open Access record for a PMCID
    ///
    /// Returns `Ok(None)` when the article is not in the open-access subset.
    pub async fn fetch_oa_record(&self, pmcid: &str) -> Result<Option<OaRecord>> {
        let pmcid = normalize_pmcid(pmcid)?;
        let url = format!("{}?id={}", self.config.oa_base_url, pmcid);

        let response = self.get(&url).await?;
        let xml = response.text().await?;
        parse_oa_response(&xml, &pmcid)
    }

    /// Resolve the `tgz` package URL for a PMCID, rewritten from `ftp://` to `https://`
    ///
    /// Returns `Ok(None)` when there is no OA record or no `tgz` link.
    #[instrument(skip(self))]
    pub async fn resolve_tgz_url(&self, pmcid: &str) -> Result<Option<String>> {
        let Some(record) = self.fetch_oa_record(pmcid).await? else {
            info!("Skipped, no open access record");
            return Ok(None);
        };

        match record.tgz_href() {
            Some(href) => {
                let url = ftp_to_https(href);
                debug!(url = %url, "Resolved package URL");
                Ok(Some(url))
            }
            None => {
                info!(links = record.links.len(), "Non tgz link");
                Ok(None)
            }
        }
    }

    /// Stream a package to a temporary `.tar.gz` file
    ///
    /// # Errors
    ///
    /// * `CorpusError::ApiError` - If the download returns a non-success status
    /// * `CorpusError::RequestError` - If the transfer fails
    /// * `CorpusError::IoError` - If the temporary file cannot be written
    pub async fn download_archive(&self, url: &str) -> Result<TempArchive> {
        let response = self.get(url).await?;

        let (archive, mut file) = TempArchive::create()?;
        let mut stream = response.bytes_stream();
        let mut bytes = 0usize;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(CorpusError::from)?;
            bytes += chunk.len();
            file.write_all(&chunk)
                .await
                .map_err(|e| CorpusError::io("Failed to write to temporary file", e))?;
        }

        file.flush()
            .await
            .map_err(|e| CorpusError::io("Failed to flush temporary file", e))?;

        debug!(path = %archive.path().display(), bytes, "Downloaded package");
        Ok(archive)
    }

    /// Fetch one article and extract its retained text
    ///
    /// Returns `Ok(None)` when the article has no downloadable package. The
    /// temporary package is removed before this returns, on every path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pmc_corpus::PmcClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PmcClient::new()?;
    ///     if let Some(doc) = client.fetch_document_text("PMC10609202").await? {
    ///         println!("{}", doc.joined());
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn fetch_document_text(&self, pmcid: &str) -> Result<Option<DocumentText>> {
        let Some(url) = self.resolve_tgz_url(pmcid).await? else {
            return Ok(None);
        };

        let archive = self.download_archive(&url).await?;
        let xml = archive.read_nxml()?;
        drop(archive);

        extract_document_text(&xml, pmcid).map(Some)
    }

    async fn get(&self, url: &str) -> Result<Response> {
        debug!("Making API request to: {url}");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(CorpusError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

/// Normalize PMCID format (ensure it starts with "PMC")
pub fn normalize_pmcid(pmcid: &str) -> Result<String> {
    let trimmed = pmcid.trim();
    let digits = trimmed
        .strip_prefix("PMC")
        .or_else(|| trimmed.strip_prefix("pmc"))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CorpusError::InvalidPmcid {
            pmcid: pmcid.to_string(),
        });
    }

    Ok(format!("PMC{digits}"))
}
