//! Show command implementation.

use super::connect;
use anyhow::{Context, Result};
use nopas_client::{ClientConfig, Session};
use tracing::info;

/// Runs the show command.
pub async fn run(config: ClientConfig) -> Result<()> {
    let controller = connect(config)?;
    let mut session = Session::new();
    controller
        .refresh(&mut session)
        .await
        .with_context(|| "Failed to refresh policy")?;

    if let Some(defaults) = session.defaults() {
        info!("Default options: {}", defaults);
    }

    let Some(policy) = session.policy() else {
        anyhow::bail!("No policy loaded");
    };

    info!("Checking frequency: {}", policy.checking_frequency);
    info!("Ensembler: {}", policy.ensembler);

    info!("Resources ({}):", policy.resources.len());
    for (name, fields) in &policy.resources {
        info!(
            "  {}: ratio {}, scale-in {}, scale-out {}",
            name, fields.ratio, fields.scale_in_cooldown, fields.scale_out_cooldown
        );
        info!("    nomad: {}", serde_json::to_string(&fields.nomad_params)?);
        info!("    ec2: {}", serde_json::to_string(&fields.ec2_params)?);
    }

    info!("Subpolicies ({}):", policy.subpolicies.len());
    for (name, fields) in &policy.subpolicies {
        let metadata = fields
            .metadata
            .parse()
            .map_or_else(|_| "<invalid>".to_string(), |value| value.to_string());
        info!(
            "  {}: manages [{}], metadata {}",
            name,
            fields.managed_resources.join(", "),
            metadata
        );
    }

    Ok(())
}
