//! Schema command implementation.

use anyhow::{Context, Result};
use nopas_policy::PolicyDocument;
use std::fs;
use tracing::info;

/// Runs the schema command.
pub fn run(output_path: &str) -> Result<()> {
    let schema = schemars::schema_for!(PolicyDocument);
    let output = serde_json::to_string_pretty(&schema)?;

    fs::write(output_path, &output)
        .with_context(|| format!("Failed to write schema file: {output_path}"))?;

    info!("Policy schema written to: {}", output_path);
    Ok(())
}
