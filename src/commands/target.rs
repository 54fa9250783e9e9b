// ABOUTME: Target command - manages the persisted warehouse URL
// ABOUTME: Lets sync/status/validate omit --warehouse once it is set

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::state;

#[derive(Args)]
pub struct TargetArgs {
    #[command(subcommand)]
    command: TargetCommands,
}

#[derive(Subcommand)]
enum TargetCommands {
    /// Set the warehouse database URL
    Set {
        /// The PostgreSQL URL to set as the warehouse
        url: String,
    },
    /// Unset the warehouse database URL
    Unset,
    /// Show the current warehouse database URL
    Get,
}

pub async fn target(args: TargetArgs) -> Result<()> {
    match args.command {
        TargetCommands::Set { url } => {
            let mut state = state::load().context("Failed to load state")?;
            state.warehouse_url = Some(url.clone());
            state::save(&state).context("Failed to save state")?;
            println!("Warehouse database URL set to: {}", url);
        }
        TargetCommands::Unset => {
            let mut state = state::load().context("Failed to load state")?;
            state.warehouse_url = None;
            state::save(&state).context("Failed to save state")?;
            println!("Warehouse database URL unset.");
        }
        TargetCommands::Get => {
            let state = state::load().context("Failed to load state")?;
            match state.warehouse_url {
                Some(url) => println!("Current warehouse database URL: {}", url),
                None => println!("Warehouse database URL is not set."),
            }
        }
    }
    Ok(())
}
