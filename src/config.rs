//! Client configuration shared by the PubMed and PMC clients

use std::time::Duration;

/// Literature index serving `format=pmid` result pages
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov";

/// PMC ID Converter API
pub const DEFAULT_IDCONV_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/utils/idconv/v1.0/";

/// PMC Open Access web service
pub const DEFAULT_OA_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/utils/oa/oa.fcgi";

/// Hits per search result page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// The ID converter accepts up to 200 ids per request; 100 stays well inside that.
pub const DEFAULT_BATCH_SIZE: usize = 100;

const DEFAULT_TOOL: &str = "pmc-corpus";

/// Configuration for the NCBI-facing clients
///
/// # Example
///
/// ```
/// use pmc_corpus::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_email("researcher@university.edu")
///     .with_tool("MyCorpusBuilder");
///
/// assert_eq!(config.effective_tool(), "MyCorpusBuilder");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Contact email sent with ID-conversion requests
    pub email: Option<String>,
    /// Tool name sent with ID-conversion requests
    pub tool: Option<String>,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
    pub search_base_url: String,
    pub idconv_base_url: String,
    pub oa_base_url: String,
    /// Hits requested per search page
    pub page_size: usize,
    /// Identifiers per ID-conversion request
    pub batch_size: usize,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            email: None,
            tool: None,
            user_agent: None,
            timeout: None,
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            idconv_base_url: DEFAULT_IDCONV_BASE_URL.to_string(),
            oa_base_url: DEFAULT_OA_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_search_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.search_base_url = url.into();
        self
    }

    pub fn with_idconv_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.idconv_base_url = url.into();
        self
    }

    pub fn with_oa_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.oa_base_url = url.into();
        self
    }

    /// Point all three NCBI services at one host (used with mock servers)
    pub fn with_base_url<S: Into<String>>(self, url: S) -> Self {
        let url = url.into();
        let root = url.trim_end_matches('/');
        self.with_search_base_url(root)
            .with_idconv_base_url(format!("{root}/pmc/utils/idconv/v1.0/"))
            .with_oa_base_url(format!("{root}/pmc/utils/oa/oa.fcgi"))
    }

    /// Zero is clamped to one
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Zero is clamped to one
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("{}/{}", DEFAULT_TOOL, env!("CARGO_PKG_VERSION")))
    }

    /// NCBI identification parameters (`tool`, then `email` when set)
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("tool".to_string(), self.effective_tool().to_string())];
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }
        params
    }

    /// `build_api_params` rendered as `key=value&...` with encoded values
    pub(crate) fn encoded_api_params(&self) -> String {
        self.build_api_params()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub(crate) fn build_http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.effective_user_agent());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
