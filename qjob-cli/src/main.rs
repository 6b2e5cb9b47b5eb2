//! qjob CLI
//!
//! Command-line interface for submitting, inspecting and collecting results of
//! jobs in a remote compute workspace.

mod commands;
mod config;
mod id_resolver;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use qjob_client::WorkspaceConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qjob")]
#[command(about = "Remote job workspace CLI", long_about = None)]
struct Cli {
    /// Subscription ID (ignored when --resource-id is valid)
    #[arg(long, env = "AZURE_QUANTUM_SUBSCRIPTION_ID")]
    subscription_id: Option<String>,

    /// Resource group name (ignored when --resource-id is valid)
    #[arg(long, env = "AZURE_QUANTUM_WORKSPACE_RG")]
    resource_group: Option<String>,

    /// Workspace name (ignored when --resource-id is valid)
    #[arg(long = "workspace", env = "AZURE_QUANTUM_WORKSPACE_NAME")]
    workspace_name: Option<String>,

    /// Full workspace resource ID
    #[arg(long, env = "AZURE_QUANTUM_RESOURCE_ID")]
    resource_id: Option<String>,

    /// Workspace region, e.g. "East US" or "eastus"
    #[arg(long, env = "AZURE_QUANTUM_WORKSPACE_LOCATION")]
    location: Option<String>,

    /// Storage account connection string
    #[arg(long, env = "AZURE_QUANTUM_STORAGE", hide_env_values = true)]
    storage: Option<String>,

    /// Override the service URL derived from the location
    #[arg(long, env = "AZURE_QUANTUM_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token for the service
    #[arg(long, env = "AZURE_QUANTUM_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qjob=info,qjob_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        workspace: WorkspaceConfig {
            subscription_id: cli.subscription_id,
            resource_group: cli.resource_group,
            name: cli.workspace_name,
            resource_id: cli.resource_id,
            location: cli.location,
            storage: cli.storage,
            base_url: cli.base_url,
        },
        access_token: cli.access_token,
    };

    handle_command(cli.command, &config).await
}
