//! Push command implementation.

use super::{connect, ensure_sent};
use anyhow::{Context, Result};
use nopas_client::{ClientConfig, Session};
use nopas_policy::{to_ui, PolicyDocument};
use std::fs;
use std::path::Path;
use tracing::info;

/// Runs the push command.
pub async fn run(config: ClientConfig, input_path: &str) -> Result<()> {
    info!("Pushing policy: {}", input_path);

    let content = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read policy file: {input_path}"))?;

    let document = parse_document(input_path, &content)
        .with_context(|| format!("Failed to parse policy file: {input_path}"))?;

    let session = Session::with_policy(to_ui(&document));
    let controller = connect(config)?;
    let outcome = controller
        .send(&session)
        .await
        .with_context(|| "Failed to send policy")?;
    ensure_sent(&outcome)?;

    info!("Policy replaced, run `nopas show` to see the applied state");
    Ok(())
}

fn parse_document(path: &str, content: &str) -> Result<PolicyDocument> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("yaml" | "yml") => Ok(serde_yaml::from_str(content)?),
        _ => Ok(PolicyDocument::from_json(content)?),
    }
}
