//! Fetch command implementation.

use super::connect;
use anyhow::{Context, Result};
use nopas_client::{ClientConfig, Transport};
use nopas_policy::PolicyDocument;
use std::fs;
use tracing::info;

/// Runs the fetch command.
///
/// Writes the document as served, whether or not it could be sent back.
pub async fn run(config: ClientConfig, output_path: &str, format: &str) -> Result<()> {
    let controller = connect(config)?;
    let document = controller
        .transport()
        .fetch_state()
        .await
        .with_context(|| "Failed to fetch policy")?;

    let output = render(&document, format)?;
    fs::write(output_path, &output)
        .with_context(|| format!("Failed to write output file: {output_path}"))?;

    info!(
        "Policy with {} resources written to: {}",
        document.resources.len(),
        output_path
    );
    Ok(())
}

fn render(document: &PolicyDocument, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "json" => Ok(document.to_json_pretty()?),
        "yaml" | "yml" => Ok(serde_yaml::to_string(document)?),
        _ => anyhow::bail!("Unknown output format: {format}. Use 'json' or 'yaml'."),
    }
}
