//! Edit commands: refresh, apply one change, send the whole policy.

use super::{connect, ensure_sent};
use anyhow::{Context, Result};
use clap::Subcommand;
use nopas_client::{ClientConfig, Session};
use nopas_policy::{
    JsonInput, PolicyUiState, Provider, ResourceField, ResourceFields, SubpolicyField,
    SubpolicyFields,
};
use tracing::info;

/// Top-level policy fields.
#[derive(Subcommand)]
pub enum SetField {
    /// Set how often the policy is evaluated
    Frequency {
        /// Duration expression, e.g. 1m
        value: String,
    },

    /// Set the ensembler
    Ensembler {
        /// Ensembler name
        value: String,
    },
}

/// Resource edits.
#[derive(Subcommand)]
pub enum ResourceAction {
    /// Append a new resource
    Add {
        /// Resource name
        name: String,

        /// Nomad task count per EC2 instance
        #[arg(long, default_value = "1")]
        ratio: String,

        /// Cooldown after scaling in
        #[arg(long, default_value = "5m")]
        scale_in: String,

        /// Cooldown after scaling out
        #[arg(long, default_value = "5m")]
        scale_out: String,

        /// Start with empty parameter blocks instead of provider templates
        #[arg(long)]
        bare: bool,
    },

    /// Rename a resource, updating subpolicies that manage it
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },

    /// Delete a resource and drop it from subpolicies
    Delete {
        /// Resource name
        name: String,
    },

    /// Set a resource field (scale-in-cooldown, scale-out-cooldown, ratio)
    Set {
        /// Resource name
        name: String,
        /// Field name
        field: String,
        /// New value
        value: String,
    },
}

/// Subpolicy edits.
#[derive(Subcommand)]
pub enum SubpolicyAction {
    /// Append a new subpolicy
    Add {
        /// Subpolicy name
        name: String,

        /// Comma separated names of managed resources
        #[arg(long, default_value = "")]
        manages: String,

        /// Metadata as JSON
        #[arg(long)]
        metadata: Option<String>,
    },

    /// Rename a subpolicy
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },

    /// Delete a subpolicy
    Delete {
        /// Subpolicy name
        name: String,
    },

    /// Set a subpolicy field (managed-resources, metadata)
    Set {
        /// Subpolicy name
        name: String,
        /// Field name
        field: String,
        /// New value
        value: String,
    },
}

/// Provider parameter edits.
#[derive(Subcommand)]
pub enum ParamAction {
    /// Set a parameter, adding it if missing
    Set {
        /// Resource name
        resource: String,
        /// Provider (nomad or ec2)
        provider: String,
        /// Parameter key
        key: String,
        /// Value, read as a JSON literal when possible
        value: String,
    },

    /// Delete a parameter
    Delete {
        /// Resource name
        resource: String,
        /// Provider (nomad or ec2)
        provider: String,
        /// Parameter key
        key: String,
    },
}

/// Runs a `set` command.
pub async fn set(config: ClientConfig, field: SetField) -> Result<()> {
    match field {
        SetField::Frequency { value } => {
            apply(config, "set checking frequency", move |p| {
                Ok(p.set_checking_frequency(&value))
            })
            .await
        }
        SetField::Ensembler { value } => {
            apply(config, "set ensembler", move |p| Ok(p.set_ensembler(&value))).await
        }
    }
}

/// Runs a `resource` command.
pub async fn resource(config: ClientConfig, action: ResourceAction) -> Result<()> {
    match action {
        ResourceAction::Add {
            name,
            ratio,
            scale_in,
            scale_out,
            bare,
        } => {
            let description = format!("add resource '{name}'");
            apply(config, &description, move |p| {
                let defaults = if bare {
                    ResourceFields::default()
                } else {
                    ResourceFields::with_defaults()
                };
                Ok(p.add_resource(&name, defaults)?
                    .update_resource(&name, ResourceField::Ratio, &ratio)?
                    .update_resource(&name, ResourceField::ScaleInCooldown, &scale_in)?
                    .update_resource(&name, ResourceField::ScaleOutCooldown, &scale_out)?)
            })
            .await
        }
        ResourceAction::Rename { old, new } => {
            let description = format!("rename resource '{old}' to '{new}'");
            apply(config, &description, move |p| Ok(p.rename_resource(&old, &new)?)).await
        }
        ResourceAction::Delete { name } => {
            let description = format!("delete resource '{name}'");
            apply(config, &description, move |p| Ok(p.delete_resource(&name))).await
        }
        ResourceAction::Set { name, field, value } => {
            let description = format!("set {field} of resource '{name}'");
            apply(config, &description, move |p| {
                let field: ResourceField = field.parse()?;
                Ok(p.update_resource(&name, field, &value)?)
            })
            .await
        }
    }
}

/// Runs a `subpolicy` command.
pub async fn subpolicy(config: ClientConfig, action: SubpolicyAction) -> Result<()> {
    match action {
        SubpolicyAction::Add {
            name,
            manages,
            metadata,
        } => {
            let description = format!("add subpolicy '{name}'");
            apply(config, &description, move |p| {
                let mut fields = SubpolicyFields::default();
                if let Some(metadata) = metadata {
                    fields.metadata = JsonInput::Pending(metadata);
                }
                Ok(p.add_subpolicy(&name, fields)?.update_subpolicy(
                    &name,
                    SubpolicyField::ManagedResources,
                    &manages,
                )?)
            })
            .await
        }
        SubpolicyAction::Rename { old, new } => {
            let description = format!("rename subpolicy '{old}' to '{new}'");
            apply(config, &description, move |p| Ok(p.rename_subpolicy(&old, &new)?)).await
        }
        SubpolicyAction::Delete { name } => {
            let description = format!("delete subpolicy '{name}'");
            apply(config, &description, move |p| Ok(p.delete_subpolicy(&name))).await
        }
        SubpolicyAction::Set { name, field, value } => {
            let description = format!("set {field} of subpolicy '{name}'");
            apply(config, &description, move |p| {
                let field: SubpolicyField = field.parse()?;
                Ok(p.update_subpolicy(&name, field, &value)?)
            })
            .await
        }
    }
}

/// Runs a `param` command.
pub async fn param(config: ClientConfig, action: ParamAction) -> Result<()> {
    match action {
        ParamAction::Set {
            resource,
            provider,
            key,
            value,
        } => {
            let description = format!("set {provider} parameter {key} of '{resource}'");
            apply(config, &description, move |p| {
                let provider: Provider = provider.parse()?;
                Ok(p.set_parameter(&resource, provider, &key, &value)?)
            })
            .await
        }
        ParamAction::Delete {
            resource,
            provider,
            key,
        } => {
            let description = format!("delete {provider} parameter {key} of '{resource}'");
            apply(config, &description, move |p| {
                let provider: Provider = provider.parse()?;
                Ok(p.delete_parameter(&resource, provider, &key)?)
            })
            .await
        }
    }
}

async fn apply<F>(config: ClientConfig, description: &str, edit: F) -> Result<()>
where
    F: FnOnce(&PolicyUiState) -> nopas_policy::Result<PolicyUiState>,
{
    let controller = connect(config)?;
    let mut session = Session::new();

    controller
        .refresh(&mut session)
        .await
        .with_context(|| "Failed to refresh policy")?;

    session
        .apply(edit)
        .with_context(|| format!("Failed to {description}"))?;

    let outcome = controller
        .send(&session)
        .await
        .with_context(|| "Failed to send policy")?;
    ensure_sent(&outcome)?;

    info!("Done: {}", description);
    Ok(())
}
