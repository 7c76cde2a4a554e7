//! PMC Open Access web service response parsing
//!
//! A record lists one `link` per downloadable package. Responses with a single
//! link and with several are read into the same `Vec`.

use crate::error::{CorpusError, Result};
use crate::pmc::models::{OaLink, OaRecord};
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename = "OA")]
struct OaResponse {
    #[serde(rename = "error")]
    error: Option<OaError>,
    #[serde(rename = "records")]
    records: Option<OaRecords>,
}

#[derive(Debug, Deserialize)]
struct OaError {
    #[serde(rename = "@code")]
    code: Option<String>,
    #[serde(rename = "$text")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OaRecords {
    #[serde(rename = "record", default)]
    record: Vec<OaRecordXml>,
}

#[derive(Debug, Deserialize)]
struct OaRecordXml {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@license")]
    license: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<OaLinkXml>,
}

#[derive(Debug, Deserialize)]
struct OaLinkXml {
    #[serde(rename = "@format")]
    format: Option<String>,
    #[serde(rename = "@updated")]
    updated: Option<String>,
    #[serde(rename = "@href")]
    href: Option<String>,
}

/// Parse an OA API response
///
/// Returns `Ok(None)` when the response carries no record collection, which
/// is how the service answers for articles outside the open-access subset.
pub fn parse_oa_response(xml: &str, pmcid: &str) -> Result<Option<OaRecord>> {
    let response: OaResponse = from_str(xml).map_err(|e| {
        debug!(pmcid = %pmcid, error = %e, "Failed to parse OA API response");
        CorpusError::XmlError(format!("Failed to parse OA API response: {e}"))
    })?;

    if let Some(error) = &response.error {
        debug!(
            pmcid = %pmcid,
            code = ?error.code,
            message = ?error.message,
            "OA API returned an error"
        );
    }

    let Some(record) = response
        .records
        .and_then(|records| records.record.into_iter().next())
    else {
        return Ok(None);
    };

    Ok(Some(OaRecord {
        pmcid: record.id.unwrap_or_else(|| pmcid.to_string()),
        license: record.license,
        links: record
            .links
            .into_iter()
            .map(|link| OaLink {
                format: link.format,
                href: link.href,
                updated: link.updated,
            })
            .collect(),
    }))
}

/// Rewrite an `ftp://` href to `https://`, leaving everything else untouched
pub fn ftp_to_https(href: &str) -> String {
    match href.strip_prefix("ftp://") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_string(),
    }
}
