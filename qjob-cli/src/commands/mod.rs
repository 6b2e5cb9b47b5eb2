//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod workspace;

pub use job::JobCommands;
pub use workspace::WorkspaceCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Workspace information
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Workspace { command } => {
            workspace::handle_workspace_command(command, config).await
        }
    }
}
