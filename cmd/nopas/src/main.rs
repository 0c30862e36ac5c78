//! Nopas CLI - autoscaling policy editor.
//!
//! Commands:
//! - `nopas show` - Print the current policy
//! - `nopas fetch` - Save the current policy to a file
//! - `nopas push` - Replace the policy with a file
//! - `nopas set|resource|subpolicy|param` - Edit the policy in place
//! - `nopas schema` - Write the policy document JSON schema

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::edit::{ParamAction, ResourceAction, SetField, SubpolicyAction};
use nopas_client::{ClientConfig, ENDPOINT_ENV};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nopas")]
#[command(about = "Edit and sync Nomad parametric autoscaler policies")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the policy service
    #[arg(long, global = true, env = ENDPOINT_ENV, default_value = "http://localhost:8080")]
    endpoint: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the current policy and default options
    Show,

    /// Fetch the current policy and write it to a file
    Fetch {
        /// Output path
        #[arg(short, long, default_value = "policy.json")]
        output: String,

        /// Output format (json or yaml)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Replace the policy with the document in a file
    Push {
        /// Path to a policy document (.json, .yaml or .yml)
        #[arg(short, long, default_value = "policy.json")]
        input: String,
    },

    /// Write the JSON schema of the policy document
    Schema {
        /// Output path
        #[arg(short, long, default_value = "policy.schema.json")]
        output: String,
    },

    /// Set a top-level policy field
    Set {
        #[command(subcommand)]
        field: SetField,
    },

    /// Add, rename, delete or edit resources
    Resource {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Add, rename, delete or edit subpolicies
    Subpolicy {
        #[command(subcommand)]
        action: SubpolicyAction,
    },

    /// Set or delete provider parameters of a resource
    Param {
        #[command(subcommand)]
        action: ParamAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ClientConfig {
        endpoint: cli.endpoint,
        timeout_seconds: cli.timeout,
    };

    match cli.command {
        Commands::Show => commands::show::run(config).await,
        Commands::Fetch { output, format } => commands::fetch::run(config, &output, &format).await,
        Commands::Push { input } => commands::push::run(config, &input).await,
        Commands::Schema { output } => commands::schema::run(&output),
        Commands::Set { field } => commands::edit::set(config, field).await,
        Commands::Resource { action } => commands::edit::resource(config, action).await,
        Commands::Subpolicy { action } => commands::edit::subpolicy(config, action).await,
        Commands::Param { action } => commands::edit::param(config, action).await,
    }
}
