//! Command implementations.

pub mod edit;
pub mod fetch;
pub mod push;
pub mod schema;
pub mod show;

use anyhow::{Context, Result};
use nopas_client::{ClientConfig, HttpTransport, SendOutcome, SkipReason, SyncController};

/// Builds a sync controller talking HTTP to the configured service.
fn connect(config: ClientConfig) -> Result<SyncController<HttpTransport>> {
    let transport =
        HttpTransport::new(config).with_context(|| "Failed to create policy service client")?;
    Ok(SyncController::new(transport))
}

/// Turns a skipped send into an error.
fn ensure_sent(outcome: &SendOutcome) -> Result<()> {
    match outcome {
        SendOutcome::Sent => Ok(()),
        SendOutcome::Skipped(SkipReason::NotLoaded) => {
            anyhow::bail!("Policy not sent: nothing loaded")
        }
        SendOutcome::Skipped(SkipReason::Unsendable(reason)) => {
            anyhow::bail!("Policy not sent: {reason}")
        }
    }
}
