//! PMC ID Converter response parsing
//!
//! The converter answers a comma-joined batch of PMIDs with one `record` per
//! requested id. Only articles in PMC carry a `pmcid` attribute.

use crate::error::{CorpusError, Result};
use crate::pmc::models::IdConversion;
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename = "pmcids")]
struct IdConvResponse {
    #[serde(rename = "@status")]
    status: Option<String>,
    #[serde(rename = "record", default)]
    records: Vec<IdConvRecord>,
}

#[derive(Debug, Deserialize)]
struct IdConvRecord {
    #[serde(rename = "@requested-id")]
    requested_id: Option<String>,
    #[serde(rename = "@pmid")]
    pmid: Option<String>,
    #[serde(rename = "@pmcid")]
    pmcid: Option<String>,
    #[serde(rename = "@errmsg")]
    errmsg: Option<String>,
}

/// Parse an ID Converter XML response into its records, in response order
pub fn parse_idconv_response(xml: &str) -> Result<Vec<IdConversion>> {
    let response: IdConvResponse = from_str(xml).map_err(|e| {
        CorpusError::XmlError(format!("Failed to parse ID converter response: {e}"))
    })?;

    if response.status.as_deref().is_some_and(|s| s != "ok") {
        debug!(status = ?response.status, "ID converter reported non-ok status");
    }

    Ok(response
        .records
        .into_iter()
        .map(|record| {
            if let Some(errmsg) = &record.errmsg {
                debug!(requested_id = ?record.requested_id, errmsg = %errmsg, "No PMC record");
            }
            IdConversion {
                requested_id: record.requested_id,
                pmid: record.pmid,
                pmcid: record.pmcid.filter(|id| !id.trim().is_empty()),
            }
        })
        .collect())
}
