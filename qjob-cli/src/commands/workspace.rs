//! Workspace command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Workspace subcommands
#[derive(Subcommand)]
pub enum WorkspaceCommands {
    /// Show the resolved workspace identity
    Show,
}

pub async fn handle_workspace_command(command: WorkspaceCommands, config: &Config) -> Result<()> {
    match command {
        WorkspaceCommands::Show => show_workspace(config),
    }
}

fn show_workspace(config: &Config) -> Result<()> {
    let workspace = config.connect()?;

    println!("{}", "Workspace:".bold());
    println!("  Name:           {}", workspace.name().cyan());
    println!("  Resource group: {}", workspace.resource_group());
    println!("  Subscription:   {}", workspace.subscription_id().dimmed());
    println!("  Location:       {}", workspace.location());
    println!("  Service URL:    {}", workspace.base_url().dimmed());
    println!("  Resource ID:    {}", workspace.resource_id().dimmed());
    println!(
        "  Storage:        {}",
        if workspace.storage().is_some() {
            "configured".green()
        } else {
            "linked".dimmed()
        }
    );

    Ok(())
}
