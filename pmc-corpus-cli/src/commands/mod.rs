pub mod collect;

use std::time::Duration;

use anyhow::{Context as _, Result};
use pmc_corpus::{ClientConfig, Pipeline};

pub fn create_pipeline(
    email: Option<&str>,
    tool: &str,
    timeout_seconds: Option<u64>,
    fail_fast: bool,
) -> Result<Pipeline> {
    let mut config = ClientConfig::new().with_tool(tool);

    if let Some(email) = email {
        config = config.with_email(email);
    }

    if let Some(seconds) = timeout_seconds {
        config = config.with_timeout(Duration::from_secs(seconds));
    }

    let pipeline = Pipeline::new(config)
        .context("Failed to create HTTP clients")?
        .with_fail_fast(fail_fast);
    Ok(pipeline)
}
