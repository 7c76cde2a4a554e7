use thiserror::Error;

/// Error types for corpus collection
#[derive(Error, Debug)]
pub enum CorpusError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Non-success HTTP status from one of the NCBI services
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// IO error for temporary archives, archive members and the output file
    #[error("IO error: {message}")]
    IoError { message: String },

    /// The downloaded archive holds no `.nxml` document
    #[error("No .nxml document found in archive {path}")]
    ArchiveMissingDocument { path: String },

    /// Invalid query structure or parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid PMCID format
    #[error("Invalid PMCID format: {pmcid}")]
    InvalidPmcid { pmcid: String },
}

impl CorpusError {
    /// Whether the error came from the network layer (transport or HTTP status)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CorpusError::RequestError(_) | CorpusError::ApiError { .. }
        )
    }

    pub(crate) fn io(context: &str, err: impl std::fmt::Display) -> Self {
        CorpusError::IoError {
            message: format!("{context}: {err}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, CorpusError>;
